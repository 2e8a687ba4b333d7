//! Input model: mouse buttons and what a pointer-down landed on.
//!
//! The host translates its raw events into these types and calls the engine's
//! `on_pointer_*` entry points. Pointer positions are absolute pixels; the
//! engine converts them with the current viewport.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::state::ItemId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// What the pointer was over when the button went down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty chart area: starts a rectangle selection.
    Surface,
    /// An item's body / label: starts a move.
    ItemLabel(ItemId),
    /// An item's resize handle: starts a resize.
    ItemResizer(ItemId),
}

impl PointerTarget {
    /// The item under the pointer, if any.
    #[must_use]
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::Surface => None,
            Self::ItemLabel(id) | Self::ItemResizer(id) => Some(id),
        }
    }
}
