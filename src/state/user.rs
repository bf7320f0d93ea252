//! Current-user resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages that greet the user or guard a route hold one resolver. It fetches
//! `/auth/me` once when the page mounts and again only on explicit
//! `refetch`. Without a token no request is made.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use crate::net::ApiClient;
use crate::net::error::describe;
use crate::net::types::UserProfile;
use crate::util::scope::ScopeGuard;

pub const FETCH_USER_FAILED: &str = "Failed to fetch user";

/// Cached profile plus fetch status for one mounted page.
#[derive(Debug)]
pub struct UserResolver {
    api: ApiClient,
    user: Option<UserProfile>,
    loading: bool,
    error: Option<String>,
    activated: bool,
}

impl UserResolver {
    /// Starts in the loading state until the first `activate`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, user: None, loading: true, error: None, activated: false }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Resolve the user on first call; later calls do nothing.
    pub async fn activate(&mut self, scope: &ScopeGuard) {
        if self.activated {
            return;
        }
        self.activated = true;
        self.refetch(scope).await;
    }

    /// Resolve the user again. A result arriving after `scope` is released
    /// is dropped and the previous state is kept.
    pub async fn refetch(&mut self, scope: &ScopeGuard) {
        if !self.api.session().is_authenticated() {
            self.user = None;
            self.loading = false;
            return;
        }

        let was_loading = self.loading;
        self.loading = true;
        let Some(result) = scope.run(self.api.current_user()).await else {
            self.loading = was_loading;
            return;
        };

        match result {
            Ok(profile) => {
                self.user = Some(profile);
                self.error = None;
            }
            Err(err) => {
                tracing::debug!(code = err.error_code(), error = %err, "current user fetch failed");
                self.user = None;
                self.error = Some(describe(&err, FETCH_USER_FAILED));
            }
        }
        self.loading = false;
    }
}
