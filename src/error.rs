//! Errors raised at the crate's loading boundary.
//!
//! Pointer handling never fails: rejected candidates are policy decisions and
//! are only logged. Errors exist for decoding configuration and chart snapshots
//! supplied by the host.

/// Errors produced while loading configuration or chart state.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// The JSON configuration could not be decoded.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The chart state snapshot could not be decoded.
    #[error("state parse failed: {0}")]
    StateParse(String),

    /// A `moveable` string other than `"x"` was supplied.
    #[error("invalid moveable value '{0}' (expected true, false, \"x\" or a list of row ids)")]
    InvalidMoveable(String),

    /// An item references a row that the snapshot does not contain.
    #[error("item {item_id} references unknown row {row_id}")]
    UnknownRow { item_id: String, row_id: String },
}
