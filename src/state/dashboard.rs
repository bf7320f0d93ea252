//! Dashboard page state: client messages, analytics, reviews, and checkout.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard loads three independent sections when it mounts. Each one
//! records its own loading/error/data so a failing endpoint only blanks its
//! own panel.
//!
//! DESIGN
//! ======
//! Display aggregation (rankings, totals, average rating, star bars) is kept
//! as pure functions over the fetched data so it can be tested without a
//! backend.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use super::Redirect;
use crate::net::ApiClient;
use crate::net::error::{ApiError, describe};
use crate::net::types::{AnalyticsSnapshot, BadReview, ClientMessage, MAX_RATING, RecordId, Referrer, clamp_rating};
use crate::util::scope::ScopeGuard;

pub const LOAD_MESSAGES_FAILED: &str = "Failed to load messages";
pub const LOAD_ANALYTICS_FAILED: &str = "Failed to load analytics";
pub const LOAD_REVIEWS_FAILED: &str = "Failed to load reviews";
pub const CHECKOUT_FAILED: &str = "Failed to start checkout";

const STAR_FILLED: char = '★';
const STAR_EMPTY: char = '☆';

// =============================================================================
// SECTION
// =============================================================================

/// One independently-loaded dashboard panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: T,
}

impl<T: Default> Default for Section<T> {
    fn default() -> Self {
        Self { loading: true, error: None, data: T::default() }
    }
}

/// Loading flag and error as they were before a fetch started.
#[derive(Debug)]
struct SectionStatus {
    loading: bool,
    error: Option<String>,
}

impl<T> Section<T> {
    /// Mark the section loading; returns the prior status for [`Section::restore`].
    fn begin(&mut self) -> SectionStatus {
        let prior = SectionStatus { loading: self.loading, error: self.error.take() };
        self.loading = true;
        prior
    }

    /// Put back the status from before a fetch whose result was dropped.
    fn restore(&mut self, prior: SectionStatus) {
        self.loading = prior.loading;
        self.error = prior.error;
    }

    /// Record the outcome, or restore `prior` when the scope dropped it.
    fn finish(&mut self, outcome: Option<Result<T, ApiError>>, prior: SectionStatus, fallback: &str) {
        match outcome {
            Some(result) => self.settle(result, fallback),
            None => self.restore(prior),
        }
    }

    /// Record a fetch outcome. Data from an earlier load is kept on failure.
    fn settle(&mut self, result: Result<T, ApiError>, fallback: &str) {
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
            }
            Err(err) => {
                tracing::debug!(code = err.error_code(), error = %err, fallback, "dashboard section failed");
                self.error = Some(describe(&err, fallback));
            }
        }
        self.loading = false;
    }
}

// =============================================================================
// REVIEW REQUEST DRAFT
// =============================================================================

/// Editable review-request message for the selected client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewRequestDraft {
    pub message: String,
    pub phone_number: String,
}

impl ReviewRequestDraft {
    #[must_use]
    pub fn for_message(message: &str) -> Self {
        Self { message: message.to_owned(), phone_number: String::new() }
    }

    /// Client-side guard only; the phone number is not validated.
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub messages: Section<Vec<ClientMessage>>,
    pub analytics: Section<AnalyticsSnapshot>,
    pub reviews: Section<Vec<BadReview>>,
    pub selected: Option<RecordId>,
    pub draft: ReviewRequestDraft,
}

impl DashboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all three sections concurrently. Results that arrive after
    /// `scope` is released are dropped and each section keeps its prior
    /// loading flag and error.
    pub async fn load(&mut self, api: &ApiClient, scope: &ScopeGuard) {
        let messages_prior = self.messages.begin();
        let analytics_prior = self.analytics.begin();
        let reviews_prior = self.reviews.begin();

        let (messages, analytics, reviews) = futures::join!(
            scope.run(api.client_messages()),
            scope.run(api.analytics()),
            scope.run(api.bad_reviews()),
        );

        self.messages.finish(messages, messages_prior, LOAD_MESSAGES_FAILED);
        self.analytics.finish(analytics, analytics_prior, LOAD_ANALYTICS_FAILED);
        self.reviews.finish(reviews, reviews_prior, LOAD_REVIEWS_FAILED);

        let first = self.messages.data.first().map(|m| m.id.clone());
        if let Some(id) = first {
            if self.selected_message().is_none() {
                self.select_message(&id);
            }
        }
    }

    #[must_use]
    pub fn selected_message(&self) -> Option<&ClientMessage> {
        let id = self.selected.as_ref()?;
        self.messages.data.iter().find(|m| &m.id == id)
    }

    /// Select a loaded message and reset the draft to its text. Returns
    /// `false` when no loaded message has `id`.
    pub fn select_message(&mut self, id: &RecordId) -> bool {
        let Some(message) = self.messages.data.iter().find(|m| &m.id == id) else {
            return false;
        };
        self.draft = ReviewRequestDraft::for_message(&message.message);
        self.selected = Some(id.clone());
        true
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// Page paths by view count, highest first; ties ordered by path.
#[must_use]
pub fn page_views_ranked(snapshot: &AnalyticsSnapshot) -> Vec<(&str, u64)> {
    let mut pages: Vec<(&str, u64)> = snapshot.views_pr_page.iter().map(|(path, n)| (path.as_str(), *n)).collect();
    pages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    pages
}

#[must_use]
pub fn total_page_views(snapshot: &AnalyticsSnapshot) -> u64 {
    snapshot.views_pr_page.values().sum()
}

/// Referrers by count, highest first; ties keep backend order.
#[must_use]
pub fn referrers_ranked(snapshot: &AnalyticsSnapshot) -> Vec<&Referrer> {
    let mut referrers: Vec<&Referrer> = snapshot.top_referers.iter().collect();
    referrers.sort_by(|a, b| b.count.cmp(&a.count));
    referrers
}

/// Reviews with a numeric timestamp first, newest first; the rest keep order.
#[must_use]
pub fn reviews_newest_first(reviews: &[BadReview]) -> Vec<&BadReview> {
    let mut sorted: Vec<&BadReview> = reviews.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.created_at.as_ref().and_then(|t| t.millis())));
    sorted
}

/// Mean clamped rating, `None` when there are no reviews.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rating(reviews: &[BadReview]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: f64 = reviews.iter().map(BadReview::rating).sum();
    Some(sum / reviews.len() as f64)
}

/// Five-character bar, e.g. `★★★☆☆` for 3; the rating is rounded.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn star_bar(rating: f64) -> String {
    let filled = clamp_rating(rating).round() as usize;
    let slots = MAX_RATING as usize;
    (0..slots).map(|i| if i < filled { STAR_FILLED } else { STAR_EMPTY }).collect()
}

// =============================================================================
// CHECKOUT
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutState {
    pub loading: bool,
    pub error: Option<String>,
}

impl CheckoutState {
    /// Request a checkout session and return the redirect to it. `None` on
    /// failure (recorded in `error`) or when `scope` is released first, in
    /// which case the prior state is kept.
    pub async fn begin(&mut self, api: &ApiClient, scope: &ScopeGuard) -> Option<Redirect> {
        let prior = self.clone();
        self.loading = true;
        self.error = None;
        let Some(result) = scope.run(api.create_checkout_session()).await else {
            *self = prior;
            return None;
        };
        self.loading = false;
        match result {
            Ok(session) => Some(Redirect::to(session.url)),
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, "checkout failed");
                self.error = Some(describe(&err, CHECKOUT_FAILED));
                None
            }
        }
    }
}
