//! Checkout-session reply parsing.
//!
//! The checkout endpoint has answered with JSON objects under several field
//! names, with a bare JSON string, and with a plain-text URL. Parsing is kept
//! pure so every shape is covered without a live backend.

#[cfg(test)]
#[path = "checkout_test.rs"]
mod checkout_test;

use serde_json::Value;

use super::error::ApiError;
use super::types::CheckoutSession;

/// Candidate URL fields in priority order.
///
/// Migration shim: each name has been seen in production replies. Once the
/// backend commits to one, the rest can go.
pub const CHECKOUT_URL_FIELDS: [&str; 5] = ["url", "checkoutUrl", "checkout_url", "sessionUrl", "session_url"];

/// `true` when the reply should be read as JSON.
#[must_use]
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

/// First usable URL in a parsed JSON reply.
#[must_use]
pub fn checkout_url_from_json(value: &Value) -> Option<String> {
    if let Value::String(url) = value {
        return non_empty(url);
    }
    CHECKOUT_URL_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str).and_then(non_empty))
}

/// Turn a raw checkout reply into a redirect target.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when a JSON-typed body is not JSON, and
/// [`ApiError::MissingCheckoutUrl`] when no usable URL is present.
pub fn parse_checkout_response(content_type: Option<&str>, body: &str) -> Result<CheckoutSession, ApiError> {
    let url = if is_json_content_type(content_type) {
        let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        checkout_url_from_json(&value)
    } else {
        non_empty(body)
    };
    url.map(|url| CheckoutSession { url })
        .ok_or_else(|| ApiError::MissingCheckoutUrl { raw: body.to_owned() })
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
