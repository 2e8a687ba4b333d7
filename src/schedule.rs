//! Coalescing of bursty pointer-move input.
//!
//! Moves arriving within one display refresh collapse to the latest one; the
//! host drains the pending value once per frame. Hosts without a display
//! refresh can gate draining with [`FixedInterval`] instead.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

/// Holds at most one pending value; later pushes overwrite earlier ones.
#[derive(Debug, Clone)]
pub struct Coalescer<T> {
    pending: Option<T>,
}

impl<T> Default for Coalescer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Coalescer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `value`, replacing any pending one.
    ///
    /// Returns `true` when this push opened a new tick (nothing was pending),
    /// i.e. when the host should request a frame.
    pub fn push(&mut self, value: T) -> bool {
        self.pending.replace(value).is_none()
    }

    /// Take the pending value for processing.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drop the pending value. Returns `true` if something was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Fixed-interval gate standing in for a display refresh.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval_ms: u64,
    last_run: Option<u64>,
}

impl FixedInterval {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms, last_run: None }
    }

    /// Whether a tick is due at `now_ms`. Records the tick when it is.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_run
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.interval_ms);
        if due {
            self.last_run = Some(now_ms);
        }
        due
    }
}
