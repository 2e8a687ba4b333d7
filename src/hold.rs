//! Long-press ("hold") detection on items, driven by host-supplied timestamps.
//!
//! There is no timer here: the host passes the current time on pointer-down and
//! polls on every frame. A hold fires once the pointer has stayed down on an item
//! for the configured time without drifting past the movement threshold.

#[cfg(test)]
#[path = "hold_test.rs"]
mod hold_test;

use std::collections::HashMap;

use tracing::debug;

use crate::config::HoldConfig;
use crate::coords::Point;
use crate::state::ItemId;

#[derive(Debug, Clone, Copy)]
struct Hold {
    origin: Point,
    started_at: u64,
}

/// Tracks pending holds per item.
#[derive(Debug, Default)]
pub struct HoldDetector {
    config: HoldConfig,
    holding: HashMap<ItemId, Hold>,
    pointer: Point,
}

impl HoldDetector {
    #[must_use]
    pub fn new(config: HoldConfig) -> Self {
        Self { config, holding: HashMap::new(), pointer: Point::default() }
    }

    /// Start a hold on `item_id`. A hold already pending for the item is kept.
    pub fn on_pointer_down(&mut self, item_id: &str, pointer: Point, now_ms: u64) {
        self.pointer = pointer;
        self.holding
            .entry(item_id.to_string())
            .or_insert(Hold { origin: pointer, started_at: now_ms });
    }

    /// Record the latest pointer position.
    pub fn on_pointer_move(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    /// Cancel every pending hold.
    pub fn on_pointer_up(&mut self) {
        self.holding.clear();
    }

    /// Cancel the pending hold for one item. Returns `true` if one was pending.
    pub fn cancel(&mut self, item_id: &str) -> bool {
        self.holding.remove(item_id).is_some()
    }

    #[must_use]
    pub fn is_holding(&self, item_id: &str) -> bool {
        self.holding.contains_key(item_id)
    }

    /// Resolve every hold whose time has elapsed at `now_ms`.
    ///
    /// Elapsed holds are removed; the ids of those whose pointer stayed within
    /// the movement threshold are returned, sorted.
    pub fn poll(&mut self, now_ms: u64) -> Vec<ItemId> {
        let due: Vec<ItemId> = self
            .holding
            .iter()
            .filter(|(_, h)| now_ms.saturating_sub(h.started_at) >= self.config.time)
            .map(|(id, _)| id.clone())
            .collect();
        let mut fired = Vec::new();
        for id in due {
            let Some(hold) = self.holding.remove(&id) else {
                continue;
            };
            let dx = (hold.origin.x - self.pointer.x).abs();
            let dy = (hold.origin.y - self.pointer.y).abs();
            if dx <= self.config.movement_threshold && dy <= self.config.movement_threshold {
                debug!(item = %id, "hold: fired");
                fired.push(id);
            }
        }
        fired.sort();
        fired
    }
}
