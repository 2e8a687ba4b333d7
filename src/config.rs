//! Engine configuration decoded from the chart's JSON options.
//!
//! Every field has a default, so `{}` is a valid configuration. Snap functions
//! cannot be expressed in JSON and are attached with [`MovementConfig::with_snap`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HOLD_MOVEMENT_THRESHOLD_PX, DEFAULT_HOLD_TIME_MS};
use crate::error::TimelineError;
use crate::hit::EntityKind;
use crate::snap::SnapPolicy;

/// Item drag and resize options.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovementConfig {
    /// Items may be dragged.
    pub moveable: bool,
    /// Items may be resized from their end handle.
    pub resizeable: bool,
    /// Reject intervals that collide with other items in the same row.
    pub collision_detection: bool,
    /// Reject intervals that leave the chart's global time bounds.
    pub out_of_bounds_check: bool,
    /// Show a ghost proxy while dragging.
    pub ghost: bool,
    /// Global snap functions, identity unless set programmatically.
    #[serde(skip)]
    pub snap: SnapPolicy,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            moveable: true,
            resizeable: true,
            collision_detection: true,
            out_of_bounds_check: false,
            ghost: true,
            snap: SnapPolicy::default(),
        }
    }
}

impl MovementConfig {
    /// Replace the global snap policy.
    #[must_use]
    pub fn with_snap(mut self, snap: SnapPolicy) -> Self {
        self.snap = snap;
        self
    }

    /// Whether item interaction is wired at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.moveable || self.resizeable
    }
}

/// Rectangle selection options.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Grid rows and grid blocks are selectable.
    pub grid: bool,
    /// Items are selectable.
    pub items: bool,
    /// Item rows are selectable.
    pub rows: bool,
    /// The rectangle may extend horizontally.
    pub horizontal: bool,
    /// The rectangle may extend vertically.
    pub vertical: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { grid: false, items: true, rows: false, horizontal: true, vertical: true }
    }
}

impl SelectionConfig {
    /// Whether entities of `kind` take part in hit-testing.
    #[must_use]
    pub fn enabled(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::GridRow | EntityKind::GridRowBlock => self.grid,
            EntityKind::ItemsRow => self.rows,
            EntityKind::Item => self.items,
        }
    }
}

/// Long-press options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoldConfig {
    /// Milliseconds the pointer must stay down.
    pub time: u64,
    /// Maximum pointer travel per axis, in pixels.
    pub movement_threshold: f64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self { time: DEFAULT_HOLD_TIME_MS, movement_threshold: DEFAULT_HOLD_MOVEMENT_THRESHOLD_PX }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub movement: MovementConfig,
    pub selection: SelectionConfig,
    pub hold: HoldConfig,
}

impl Config {
    /// Decode configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        serde_json::from_str(json).map_err(|e| TimelineError::ConfigParse(e.to_string()))
    }
}
