//! Uniform error contract for every backend call.
//!
//! A non-2xx reply becomes [`ApiError::Http`], whose display text is exactly
//! the message the view layer shows: the backend's own `message` field when it
//! sent one, otherwise `HTTP error! status: <code>`.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

/// Prefix for failures that never produced an HTTP status.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never completed (DNS, connect, TLS, timeout, ...).
    #[error("{prefix}: {0}", prefix = GENERIC_ERROR_MESSAGE)]
    Transport(String),

    /// A success body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// A caller-supplied header name or value is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The checkout endpoint replied without any usable redirect URL.
    #[error("No checkout URL found in response. Inspect the raw response: {raw}")]
    MissingCheckoutUrl { raw: String },

    /// Login or signup succeeded without handing back a token.
    #[error("authentication response did not include an auth token")]
    MissingAuthToken,

    /// The token was returned but the session store did not keep it.
    #[error("session could not be saved; check the session store")]
    SessionNotStored,
}

impl ApiError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http { .. } => "E_HTTP",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::InvalidHeader(_) => "E_INVALID_HEADER",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::MissingCheckoutUrl { .. } => "E_MISSING_CHECKOUT_URL",
            Self::MissingAuthToken => "E_MISSING_AUTH_TOKEN",
            Self::SessionNotStored => "E_SESSION_NOT_STORED",
        }
    }

    /// HTTP status for [`ApiError::Http`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Build the error for a non-success reply from its status and raw body.
#[must_use]
pub fn http_error(status: u16, body: &str) -> ApiError {
    let message = extract_message(body).unwrap_or_else(|| status_message(status));
    ApiError::Http { status, message }
}

/// `message` field of a JSON error body: a non-empty string, or a number or
/// boolean rendered as text.
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    match parsed.message? {
        serde_json::Value::String(message) if !message.trim().is_empty() => Some(message),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn status_message(status: u16) -> String {
    format!("HTTP error! status: {status}")
}

/// Human-readable text for view state, falling back when the error renders empty.
#[must_use]
pub fn describe(err: &ApiError, fallback: &str) -> String {
    let text = err.to_string();
    if text.trim().is_empty() { fallback.to_owned() } else { text }
}
