//! Debounce timer for search input.
//!
//! Each keystroke triggers a new generation; a waiter only fires if its
//! generation is still current once the quiet interval has elapsed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::warn;

/// Default quiet interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Maximum quiet interval in milliseconds.
pub const MAX_DEBOUNCE_MS: u64 = 2000;

/// Minimum quiet interval in milliseconds.
pub const MIN_DEBOUNCE_MS: u64 = 1;

/// Cancellable debounce timer.
///
/// At most one timer is live: triggering or cancelling wakes every
/// waiter, and only the one holding the current generation fires.
#[derive(Debug)]
pub struct DebounceState {
    /// Quiet interval.
    delay: Duration,

    /// Current generation (incremented on each trigger or cancel).
    current_id: AtomicU64,

    /// Wakes waiters early when they have been superseded.
    cancel_notify: Notify,
}

impl DebounceState {
    /// Creates a debounce timer with the given quiet interval.
    ///
    /// Intervals outside `MIN_DEBOUNCE_MS..=MAX_DEBOUNCE_MS` are clamped.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: clamp_delay(delay),
            current_id: AtomicU64::new(0),
            cancel_notify: Notify::new(),
        }
    }

    /// Creates a debounce timer with the default interval.
    #[must_use]
    pub fn with_default_delay() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    /// Starts a new generation, superseding any pending timer.
    pub fn trigger(&self) -> u64 {
        let id = self.current_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_notify.notify_waiters();
        id
    }

    /// Waits out the quiet interval.
    ///
    /// Returns `None` if the generation was superseded in the meantime.
    pub async fn wait(&self, id: u64) -> Option<u64> {
        let cancelled = self.cancel_notify.notified();
        tokio::pin!(cancelled);
        // Register before checking so a trigger between the check and the
        // select is not lost.
        cancelled.as_mut().enable();

        if !self.is_valid(id) {
            return None;
        }

        tokio::select! {
            () = tokio::time::sleep(self.delay) => {
                self.is_valid(id).then_some(id)
            }
            () = &mut cancelled => None,
        }
    }

    /// Cancels any pending timer.
    pub fn cancel(&self) {
        self.current_id.fetch_add(1, Ordering::SeqCst);
        self.cancel_notify.notify_waiters();
    }

    /// Returns the current generation.
    #[must_use]
    pub fn current_id(&self) -> u64 {
        self.current_id.load(Ordering::SeqCst)
    }

    /// Returns whether a generation is still current.
    #[must_use]
    pub fn is_valid(&self, id: u64) -> bool {
        self.current_id.load(Ordering::SeqCst) == id
    }

    /// Returns the quiet interval.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

fn clamp_delay(delay: Duration) -> Duration {
    let min = Duration::from_millis(MIN_DEBOUNCE_MS);
    let max = Duration::from_millis(MAX_DEBOUNCE_MS);
    let clamped = delay.clamp(min, max);
    if clamped != delay {
        warn!(
            "[DEBOUNCE] Interval {:?} out of range, using {:?}",
            delay, clamped
        );
    }
    clamped
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::with_default_delay()
    }
}
