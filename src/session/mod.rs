//! Session token storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token is the only piece of client-side state that outlives a
//! request. Its presence is the sole signal of "logged in" across the app, so
//! every store answers `get_token` with `None` rather than failing.
//!
//! DESIGN
//! ======
//! The store is an explicit `Arc<dyn SessionStore>` handed to the API client
//! and controllers. Backends:
//! - `cookie`: the browser cookie (`hydrate` builds only).
//! - `memory`: process-local, used by tests and embedders.
//! - `file`: a small JSON file for the command-line front end.

pub mod cookie;
pub mod file;
pub mod memory;

use std::time::Duration;

pub use cookie::CookieSession;
pub use file::FileSession;
pub use memory::MemorySession;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "xano_auth_token";

/// Lifetime of a freshly stored token.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Single-value holder for the bearer token.
pub trait SessionStore: Send + Sync {
    /// Current token, or `None` when absent, expired, or unavailable.
    fn get_token(&self) -> Option<String>;

    /// Store `token`, replacing any previous one, valid for `ttl`.
    fn set_token(&self, token: &str, ttl: Duration);

    /// Forget the token.
    fn remove_token(&self);

    /// `true` iff a token is currently present.
    fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}
