//! Login, signup, and logout flow.
//!
//! SYSTEM CONTEXT
//! ==============
//! Backs the login page. The controller walks `Idle -> Loading ->
//! Authenticated | Error` and tells the caller where to navigate next. The
//! token itself lives in the session store behind the API client.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::Redirect;
use crate::net::ApiClient;
use crate::net::error::{ApiError, describe};
use crate::net::types::{AuthResponse, LoginCredentials, SignupCredentials};

pub const DEFAULT_LOGIN_REDIRECT: &str = "/dashboard";
pub const SIGNUP_REDIRECT: &str = "/dashboard";
pub const LOGOUT_REDIRECT: &str = "/login";
pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";

/// Query parameter the login page reads its post-login target from.
pub const REDIRECT_PARAM: &str = "redirect";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Idle,
    Loading,
    Error(String),
    Authenticated,
}

/// Auth form state bound to one API client.
#[derive(Debug)]
pub struct AuthController {
    api: ApiClient,
    phase: AuthPhase,
}

impl AuthController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, phase: AuthPhase::Idle }
    }

    #[must_use]
    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == AuthPhase::Loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            AuthPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// `true` iff the session store holds a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    /// Log in and return where to go next (`redirect` when it is a
    /// site-relative path, else `/dashboard`).
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message in the phase. A
    /// success reply without a token is [`ApiError::MissingAuthToken`]; a
    /// token the session store did not keep is [`ApiError::SessionNotStored`].
    pub async fn login(&mut self, credentials: &LoginCredentials, redirect: Option<&str>) -> Result<Redirect, ApiError> {
        self.phase = AuthPhase::Loading;
        let result = self.api.login(credentials).await;
        self.finish(result, LOGIN_FAILED, sanitize_redirect(redirect))
    }

    /// Create an account and return the dashboard redirect.
    ///
    /// # Errors
    ///
    /// Same contract as [`AuthController::login`].
    pub async fn signup(&mut self, credentials: &SignupCredentials) -> Result<Redirect, ApiError> {
        self.phase = AuthPhase::Loading;
        let result = self.api.signup(credentials).await;
        self.finish(result, SIGNUP_FAILED, SIGNUP_REDIRECT.to_owned())
    }

    /// Drop the token and return the login redirect.
    pub fn logout(&mut self) -> Redirect {
        self.api.logout();
        self.phase = AuthPhase::Idle;
        tracing::info!("logged out");
        Redirect::to(LOGOUT_REDIRECT)
    }

    fn finish(
        &mut self,
        result: Result<AuthResponse, ApiError>,
        fallback: &str,
        target: String,
    ) -> Result<Redirect, ApiError> {
        let outcome = result.and_then(|response| {
            if !response.auth_token.as_deref().is_some_and(|t| !t.is_empty()) {
                return Err(ApiError::MissingAuthToken);
            }
            // The store swallows write failures; only a readable token counts.
            if !self.api.session().is_authenticated() {
                return Err(ApiError::SessionNotStored);
            }
            Ok(Redirect { target })
        });
        match &outcome {
            Ok(redirect) => {
                tracing::info!(redirect = %redirect.target, "authenticated");
                self.phase = AuthPhase::Authenticated;
            }
            Err(err) => {
                tracing::debug!(code = err.error_code(), error = %err, "authentication failed");
                self.phase = AuthPhase::Error(describe(err, fallback));
            }
        }
        outcome
    }
}

/// Accept only site-relative targets; anything else falls back to `/dashboard`.
#[must_use]
pub fn sanitize_redirect(target: Option<&str>) -> String {
    target
        .map(str::trim)
        .filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.contains('\\'))
        .unwrap_or(DEFAULT_LOGIN_REDIRECT)
        .to_owned()
}

/// Post-login target from the login page's query string (`?redirect=...`).
#[must_use]
pub fn redirect_from_query(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    let requested = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned());
    sanitize_redirect(requested.as_deref())
}
