//! In-process token store.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::SessionStore;

#[derive(Debug, Clone)]
struct StoredToken {
    value: String,
    expires_at: Option<Instant>,
}

/// Mutex-guarded token with an expiry instant.
#[derive(Debug, Default)]
pub struct MemorySession {
    slot: Mutex<Option<StoredToken>>,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that already holds `token` for the default session TTL.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set_token(token, super::SESSION_TTL);
        store
    }

    fn slot(&self) -> MutexGuard<'_, Option<StoredToken>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySession {
    fn get_token(&self) -> Option<String> {
        let mut slot = self.slot();
        let expired = slot
            .as_ref()
            .and_then(|stored| stored.expires_at)
            .is_some_and(|at| Instant::now() >= at);
        if expired {
            *slot = None;
        }
        slot.as_ref().map(|stored| stored.value.clone())
    }

    fn set_token(&self, token: &str, ttl: Duration) {
        // An unrepresentable deadline means "never expires" for our purposes.
        let expires_at = Instant::now().checked_add(ttl);
        *self.slot() = Some(StoredToken { value: token.to_owned(), expires_at });
    }

    fn remove_token(&self) {
        *self.slot() = None;
    }
}
