//! Request lifetimes tied to the view that started them.
//!
//! ARCHITECTURE
//! ============
//! A view owns one [`ViewScope`] for as long as it is mounted and hands a
//! [`ScopeGuard`] to each fetch it starts. Releasing the scope (explicitly or
//! by dropping it) wakes every pending [`ScopeGuard::run`], which resolves to
//! `None` so no state is written after teardown.

#[cfg(test)]
#[path = "scope_test.rs"]
mod scope_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{Either, select};
use tokio::sync::Notify;

#[derive(Debug)]
struct ScopeInner {
    alive: AtomicBool,
    released: Notify,
}

/// Lifetime owner held by a mounted view.
#[derive(Debug)]
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

/// Cheap handle passed to each request started by the view.
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    inner: Arc<ScopeInner>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(ScopeInner { alive: AtomicBool::new(true), released: Notify::new() }) }
    }

    #[must_use]
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard { inner: Arc::clone(&self.inner) }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Tear down: cancel every in-flight guarded future. Idempotent.
    pub fn release(&self) {
        if self.inner.alive.swap(false, Ordering::AcqRel) {
            tracing::debug!("view scope released");
            self.inner.released.notify_waiters();
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.release();
    }
}

impl ScopeGuard {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Drive `fut` unless the scope is released first.
    ///
    /// Returns `None` when the scope was released before or while `fut` ran;
    /// `fut` is dropped at that point.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let released = self.inner.released.notified();
        futures::pin_mut!(released);
        // Register before the liveness check so a concurrent release cannot slip between.
        released.as_mut().enable();
        if !self.is_alive() {
            return None;
        }

        futures::pin_mut!(fut);
        match select(fut, released).await {
            Either::Left((output, _)) => self.is_alive().then_some(output),
            Either::Right(((), _)) => None,
        }
    }
}
