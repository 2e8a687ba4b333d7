//! Snap policy: pluggable functions that turn a raw candidate time into the committed one.
//!
//! A snap function receives the *original* time and a signed delta and returns the
//! *new* time. The identity policy (`time + delta`) means no snapping. Policies can
//! be overridden per row and per item; [`SnapPolicy::resolve`] picks the effective
//! pair once at gesture start.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use std::fmt;
use std::rc::Rc;

/// A single snap function `(time, delta) -> new time`.
#[derive(Clone)]
pub struct SnapFn(Rc<dyn Fn(i64, i64) -> i64>);

impl SnapFn {
    /// Wrap an arbitrary snap closure.
    pub fn new(f: impl Fn(i64, i64) -> i64 + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// `time + delta`, i.e. no snapping.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|time, delta| time + delta)
    }

    /// Round `time + delta` to the nearest multiple of `step` milliseconds.
    ///
    /// A non-positive `step` behaves like [`SnapFn::identity`].
    #[must_use]
    pub fn to_grid(step: i64) -> Self {
        if step <= 0 {
            return Self::identity();
        }
        Self::new(move |time, delta| {
            let raw = time + delta;
            let rem = raw.rem_euclid(step);
            if rem * 2 >= step { raw - rem + step } else { raw - rem }
        })
    }

    /// Apply the function.
    #[must_use]
    pub fn apply(&self, time: i64, delta: i64) -> i64 {
        (self.0)(time, delta)
    }
}

impl fmt::Debug for SnapFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SnapFn(..)")
    }
}

impl Default for SnapFn {
    fn default() -> Self {
        Self::identity()
    }
}

/// Optional snap overrides attached to a row or an item.
#[derive(Debug, Clone, Default)]
pub struct SnapOverride {
    pub start: Option<SnapFn>,
    pub end: Option<SnapFn>,
}

impl SnapOverride {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Effective start/end snap pair.
#[derive(Debug, Clone, Default)]
pub struct SnapPolicy {
    pub start: SnapFn,
    pub end: SnapFn,
}

impl SnapPolicy {
    #[must_use]
    pub fn new(start: SnapFn, end: SnapFn) -> Self {
        Self { start, end }
    }

    /// Resolve the effective policy: item override wins over row override wins over `self`.
    ///
    /// Start and end resolve independently, so an item may override only one of them.
    #[must_use]
    pub fn resolve(&self, row: Option<&SnapOverride>, item: Option<&SnapOverride>) -> SnapPolicy {
        let pick = |global: &SnapFn, row: Option<&SnapFn>, item: Option<&SnapFn>| {
            item.or(row).unwrap_or(global).clone()
        };
        SnapPolicy {
            start: pick(&self.start, row.and_then(|r| r.start.as_ref()), item.and_then(|i| i.start.as_ref())),
            end: pick(&self.end, row.and_then(|r| r.end.as_ref()), item.and_then(|i| i.end.as_ref())),
        }
    }

    /// Snapped start for `time` moved by `delta`.
    #[must_use]
    pub fn snap_start(&self, time: i64, delta: i64) -> i64 {
        self.start.apply(time, delta)
    }

    /// Snapped end for `time` moved by `delta`, before the inclusive-end adjustment.
    #[must_use]
    pub fn snap_end(&self, time: i64, delta: i64) -> i64 {
        self.end.apply(time, delta)
    }
}
