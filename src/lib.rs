//! Interaction engine for timeline / Gantt charts.
//!
//! The crate owns pointer-driven editing of a chart: dragging items in time and
//! across rows, resizing them from their end handle, rectangle multi-selection
//! of items, rows and grid blocks, and long-press detection. Rendering stays
//! with the host, which forwards raw pointer events to
//! [`engine::TimelineEngine`], reports what it has drawn through the element
//! registry, and applies the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine wiring every state machine to pointer input |
//! | [`state`] | Chart store: items, rows, time bounds, grid and selection |
//! | [`movement`] | Item drag / resize state machine |
//! | [`selection`] | Rectangle multi-selection and selection hooks |
//! | [`hold`] | Long-press detection on items |
//! | [`collision`] | Per-row overlap and bounds checks for candidate intervals |
//! | [`snap`] | Snap functions and their item > row > global resolution |
//! | [`grid`] | Grid block generation and stable block ids |
//! | [`hit`] | Rendered-element registry and rectangle hit-testing |
//! | [`coords`] | Pixel / time coordinate mapping |
//! | [`schedule`] | Per-frame coalescing of pointer-move input |
//! | [`ghost`] | Host-provided ghost proxy shown while dragging |
//! | [`input`] | Button and pointer-target types |
//! | [`config`] | JSON-decoded configuration with defaults |
//! | [`error`] | Loading errors |
//! | [`consts`] | Shared constants (hold defaults, ghost opacity, selection keys) |

pub mod collision;
pub mod config;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod error;
pub mod ghost;
pub mod grid;
pub mod hit;
pub mod hold;
pub mod input;
pub mod movement;
pub mod schedule;
pub mod selection;
pub mod snap;
pub mod state;
