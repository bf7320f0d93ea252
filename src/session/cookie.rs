//! Browser-cookie token store.
//!
//! Client-side (hydrate): reads and writes `document.cookie`.
//! Native builds: there is no cookie jar, so the token always reads as absent
//! and writes are dropped. Callers never need to know which build they run in.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

use std::time::Duration;

use super::{SessionStore, TOKEN_KEY};

/// Token store backed by the `xano_auth_token` cookie.
#[derive(Debug, Default, Clone, Copy)]
pub struct CookieSession;

impl CookieSession {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SessionStore for CookieSession {
    fn get_token(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let header = read_cookie_header()?;
            find_cookie(&header, TOKEN_KEY)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn set_token(&self, token: &str, ttl: Duration) {
        #[cfg(feature = "hydrate")]
        write_cookie(&cookie_assignment(TOKEN_KEY, token, ttl));
    }

    fn remove_token(&self) {
        #[cfg(feature = "hydrate")]
        write_cookie(&cookie_removal(TOKEN_KEY));
    }
}

// =============================================================================
// DOCUMENT ACCESS
// =============================================================================

#[cfg(feature = "hydrate")]
fn html_document() -> Option<web_sys::HtmlDocument> {
    use wasm_bindgen::JsCast;

    web_sys::window()?.document()?.dyn_into::<web_sys::HtmlDocument>().ok()
}

#[cfg(feature = "hydrate")]
fn read_cookie_header() -> Option<String> {
    match html_document()?.cookie() {
        Ok(header) => Some(header),
        Err(err) => {
            tracing::warn!(?err, "document.cookie read failed");
            None
        }
    }
}

#[cfg(feature = "hydrate")]
fn write_cookie(assignment: &str) {
    let Some(doc) = html_document() else {
        return;
    };
    if let Err(err) = doc.set_cookie(assignment) {
        tracing::warn!(?err, "document.cookie write failed");
    }
}

// =============================================================================
// COOKIE STRINGS
// =============================================================================

/// Find `key` in a `document.cookie` header and percent-decode its value.
/// Empty values count as absent.
#[cfg(any(test, feature = "hydrate"))]
fn find_cookie(header: &str, key: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name.trim() != key {
            return None;
        }
        let value = value.trim();
        let decoded = match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_owned(),
        };
        (!decoded.is_empty()).then_some(decoded)
    })
}

#[cfg(any(test, feature = "hydrate"))]
fn cookie_assignment(key: &str, token: &str, ttl: Duration) -> String {
    format!("{key}={}; max-age={}; path=/; SameSite=Lax", urlencoding::encode(token), ttl.as_secs())
}

#[cfg(any(test, feature = "hydrate"))]
fn cookie_removal(key: &str) -> String {
    format!("{key}=; max-age=0; path=/")
}
