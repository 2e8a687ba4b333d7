//! Collision detection between an item's candidate interval and its row.
//!
//! Rows are the unit of mutual exclusion: items never overlap within a row but
//! may overlap freely across rows.

#[cfg(test)]
#[path = "collision_test.rs"]
mod collision_test;

use crate::config::MovementConfig;
use crate::consts::MIN_INTERVAL_MS;
use crate::state::{ChartState, ItemTime};

/// Whether two inclusive intervals share at least one millisecond.
///
/// True when `a` starts inside `b`, ends inside `b`, or covers `b` entirely.
#[must_use]
pub fn overlaps(a: ItemTime, b: ItemTime) -> bool {
    (a.start >= b.start && a.start <= b.end)
        || (a.end >= b.start && a.end <= b.end)
        || (a.start <= b.start && a.end >= b.end)
}

/// Read-only collision checks against the chart state under a movement config.
#[derive(Debug, Clone, Copy)]
pub struct CollisionDetector<'a> {
    state: &'a ChartState,
    config: &'a MovementConfig,
}

impl<'a> CollisionDetector<'a> {
    #[must_use]
    pub fn new(state: &'a ChartState, config: &'a MovementConfig) -> Self {
        Self { state, config }
    }

    /// Whether placing `item_id` at `[start, end]` in `row_id` is forbidden.
    ///
    /// Checks, in order: detection disabled (never a collision), out of the chart's
    /// time bounds (when enabled), degenerate duration, overlap with any other item
    /// in the row.
    #[must_use]
    pub fn is_collision(&self, row_id: &str, item_id: &str, start: i64, end: i64) -> bool {
        if !self.config.collision_detection {
            return false;
        }
        let bounds = self.state.time;
        if self.config.out_of_bounds_check && (start < bounds.from || end > bounds.to) {
            return true;
        }
        if end.abs_diff(start) <= MIN_INTERVAL_MS {
            return true;
        }
        let candidate = ItemTime::new(start, end);
        self.state
            .row_items(row_id)
            .filter(|other| other.id != item_id)
            .any(|other| overlaps(candidate, other.time))
    }
}
