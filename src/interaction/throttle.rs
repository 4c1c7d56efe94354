//! Time-windowed call coalescing
//!
//! [`Throttle`] lets at most one value through per interval. The first call
//! after a quiet period passes immediately; calls inside the window replace a
//! single pending value, which [`Throttle::poll`] releases once the window has
//! elapsed. Everything in between is dropped.
//!
//! Time is always supplied by the caller, so the throttle has no timers of
//! its own and is trivially testable.

use std::time::{Duration, Instant};

/// Coalesces values to at most one per interval, keeping the most recent
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle with the given window
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a value; returns it if it may be acted on now
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        if self.window_elapsed(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the pending value if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.window_elapsed(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether a value is waiting for the window to elapse
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes releasable
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_emit) {
            (Some(_), Some(last)) => Some(last + self.interval),
            _ => None,
        }
    }

    /// Drop the pending value and restart the window
    ///
    /// The next call after a cancel passes straight through.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_emit = None;
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        self.last_emit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }
}
