//! Ghost proxy: the translucent stand-in that follows the pointer while an item is dragged.
//!
//! The engine never touches rendering. It asks a host-supplied [`GhostFactory`]
//! for an opaque [`GhostProxy`] at drag start, repositions it on every move and
//! releases it on pointer-up.

use crate::coords::{Point, Rect};

/// Host-side handle to a spawned ghost.
pub trait GhostProxy {
    /// Move the ghost's top-left corner to `at` (chart-local pixels).
    fn position(&mut self, at: Point);
    /// Remove the ghost and restore the original item's opacity.
    fn release(&mut self);
}

/// Creates ghost proxies for items.
pub trait GhostFactory {
    /// Spawn a ghost for `item_id` covering `bounds` (chart-local) at `opacity`.
    fn spawn(&mut self, item_id: &str, bounds: Rect, opacity: f64) -> Box<dyn GhostProxy>;
}
