//! Wire DTOs for the backend's JSON shapes.
//!
//! DESIGN
//! ======
//! These types mirror remote payloads and tolerate missing optional fields.
//! No invariants are enforced here beyond what display code needs (the review
//! rating clamp).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// IDS + TIMESTAMPS
// =============================================================================

/// Record identifier; the backend uses integers but text ids are tolerated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Creation time as sent by the backend: epoch milliseconds, or free text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    /// Epoch milliseconds, when the value is numeric.
    #[must_use]
    pub fn millis(&self) -> Option<i64> {
        match self {
            Self::Millis(ms) => Some(*ms),
            Self::Text(text) => text.trim().parse::<i64>().ok(),
        }
    }

    /// RFC 3339 rendering for numeric values; text is passed through.
    #[must_use]
    pub fn display(&self) -> String {
        let Some(ms) = self.millis() else {
            return match self {
                Self::Text(text) => text.clone(),
                Self::Millis(ms) => ms.to_string(),
            };
        };
        let nanos = i128::from(ms) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|e| e.to_string())
            .and_then(|dt| dt.format(&Rfc3339).map_err(|e| e.to_string()))
            .unwrap_or_else(|_| ms.to_string())
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupCredentials {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Reply from `/auth/login` and `/auth/signup`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "authToken", default)]
    pub auth_token: Option<String>,
    /// Whatever user object the backend chose to include.
    #[serde(default)]
    pub user: Option<Value>,
}

/// Reply from `/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Fields the backend adds that this crate does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UserProfile {
    /// Name, else email, else `"User"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or("User")
    }
}

// =============================================================================
// DASHBOARD DATA
// =============================================================================

/// One entry from `/client_message`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Reply from `/event`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub unique_visits: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views_pr_page: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_referers: Vec<Referrer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    #[serde(rename = "ref", default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

impl Referrer {
    /// Referrer host, or `"direct"` when the visit had none.
    #[must_use]
    pub fn label(&self) -> &str {
        self.source.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("direct")
    }
}

/// One entry from `/bad_reviews`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BadReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

pub const MAX_RATING: f64 = 5.0;

type RatingExtractor = fn(&BadReview) -> Option<&Value>;

fn starts_field(review: &BadReview) -> Option<&Value> {
    review.starts.as_ref()
}

fn stars_field(review: &BadReview) -> Option<&Value> {
    review.stars.as_ref()
}

/// Candidate rating fields in priority order.
///
/// Migration shim: the backend has shipped the rating as both `starts` and
/// `stars` with no canonical choice. Both stay until the upstream schema
/// settles on one name; then drop the other extractor.
pub const RATING_EXTRACTORS: [RatingExtractor; 2] = [starts_field, stars_field];

impl BadReview {
    /// First numeric candidate field, clamped to `[0, 5]`; `0` when none is numeric.
    #[must_use]
    pub fn rating(&self) -> f64 {
        RATING_EXTRACTORS
            .iter()
            .find_map(|extract| extract(self).and_then(numeric))
            .map_or(0.0, clamp_rating)
    }

    #[must_use]
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Clamp into `[0, 5]`; NaN becomes `0`.
#[must_use]
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, MAX_RATING) }
}

fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

// =============================================================================
// CHECKOUT + CONTACT
// =============================================================================

/// Where to send the browser to pay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSession {
    pub url: String,
}

/// Body for `/send_mail`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub product: String,
    pub message: String,
}

/// Reply from `/send_mail`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ContactResponse {
    #[serde(default)]
    pub http_response: Option<Value>,
}
