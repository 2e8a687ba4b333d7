//! Shared numeric constants for the timeline engine.

// ── Collision ───────────────────────────────────────────────────

/// Intervals whose duration is at or below this many milliseconds are rejected.
pub const MIN_INTERVAL_MS: u64 = 1;

// ── Hold ────────────────────────────────────────────────────────

/// Default long-press duration before the hold action fires.
pub const DEFAULT_HOLD_TIME_MS: u64 = 1000;

/// Default pointer travel (per axis, in pixels) that cancels a hold.
pub const DEFAULT_HOLD_MOVEMENT_THRESHOLD_PX: f64 = 2.0;

// ── Ghost proxy ─────────────────────────────────────────────────

/// Opacity applied to the ghost proxy while an item is dragged.
pub const GHOST_OPACITY: f64 = 0.75;

// ── Selection entity keys ───────────────────────────────────────

/// Selection set key for grid rows.
pub const GRID_ROWS_KEY: &str = "chart-timeline-grid-rows";

/// Selection set key for grid row blocks.
pub const GRID_ROW_BLOCKS_KEY: &str = "chart-timeline-grid-row-blocks";

/// Selection set key for item rows.
pub const ITEMS_ROWS_KEY: &str = "chart-timeline-items-rows";

/// Selection set key for items.
pub const ITEMS_KEY: &str = "chart-timeline-items-row-items";
