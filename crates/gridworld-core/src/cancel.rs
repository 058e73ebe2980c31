//! Single-shot cancellation shared by an actor's lifecycle tasks.
//!
//! Every actor owns one [`CancelSignal`]. It is raised exactly once, when the
//! actor is destroyed (evicted, an NPC unregistering after death, or engine
//! shutdown). Tasks either poll [`CancelSignal::is_cancelled`] after taking
//! the world lock or await [`CancelSignal::cancelled`] alongside their timer.
//! Raising the signal before, during, or after a task's wake-up is safe.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Shared flag plus wake-up for an actor's destruction.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    /// State shared by every clone.
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Set once the signal has been raised.
    raised: AtomicBool,
    /// Wakes tasks parked in [`CancelSignal::cancelled`].
    notify: Notify,
}

impl CancelSignal {
    /// Create a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake all waiters.
    ///
    /// Returns `true` only for the call that actually raised it; every
    /// later call is a no-op returning `false`.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.raised.swap(true, Ordering::AcqRel);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    /// Check whether the signal has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Wait until the signal is raised.
    ///
    /// Returns immediately if it already has been.
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        let mut notified = std::pin::pin!(notified);
        // Register before checking the flag so a concurrent `cancel` cannot
        // slip between the check and the await.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Return `true` if `other` is a clone of this signal.
    pub fn same_signal(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
