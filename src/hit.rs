//! Hit-testing of the selection rectangle against rendered elements.
//!
//! The render layer registers the chart-local bounding box of every element it
//! currently shows, grouped by [`EntityKind`]. Only registered elements can be
//! hit, so rows scrolled out of a virtualized list simply stop participating.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_ROW_BLOCKS_KEY, GRID_ROWS_KEY, ITEMS_KEY, ITEMS_ROWS_KEY};
use crate::coords::Rect;

/// The four kinds of selectable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A grid row, keyed by row id.
    GridRow,
    /// A grid block (row x period cell), keyed by its composite id.
    GridRowBlock,
    /// An items row, keyed by row id.
    ItemsRow,
    /// A chart item, keyed by item id.
    Item,
}

impl EntityKind {
    /// All kinds, in hit-testing order.
    pub const ALL: [EntityKind; 4] = [Self::GridRow, Self::GridRowBlock, Self::ItemsRow, Self::Item];

    /// Key of this kind's list in the selection sets.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::GridRow => GRID_ROWS_KEY,
            Self::GridRowBlock => GRID_ROW_BLOCKS_KEY,
            Self::ItemsRow => ITEMS_ROWS_KEY,
            Self::Item => ITEMS_KEY,
        }
    }
}

/// A rendered element as seen by the hit tester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedElement {
    /// Entity id (row id, block id or item id depending on kind).
    pub id: String,
    /// Bounding box in chart-local pixels.
    pub bounds: Rect,
}

/// Registry of currently rendered elements, per entity kind.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: HashMap<EntityKind, Vec<RenderedElement>>,
}

impl ElementRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or move) one element. An existing element with the same id is replaced.
    pub fn register(&mut self, kind: EntityKind, id: impl Into<String>, bounds: Rect) {
        let id = id.into();
        let list = self.elements.entry(kind).or_default();
        if let Some(existing) = list.iter_mut().find(|e| e.id == id) {
            existing.bounds = bounds;
        } else {
            list.push(RenderedElement { id, bounds });
        }
    }

    /// Drop one element, e.g. when its row scrolls out of view.
    pub fn unregister(&mut self, kind: EntityKind, id: &str) -> bool {
        let Some(list) = self.elements.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.id != id);
        list.len() != before
    }

    /// Replace every element of one kind.
    pub fn replace(&mut self, kind: EntityKind, elements: Vec<RenderedElement>) {
        self.elements.insert(kind, elements);
    }

    /// Elements currently rendered for `kind`.
    #[must_use]
    pub fn elements(&self, kind: EntityKind) -> &[RenderedElement] {
        self.elements.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Total number of registered elements across kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `a` and `b` share at least one point (touching edges count).
///
/// On each axis, one range's edge lies within the other or one range contains the
/// other. Both axes must agree.
#[must_use]
pub fn is_inside(a: &Rect, b: &Rect) -> bool {
    let horizontal = (a.left >= b.left && a.left <= b.right)
        || (a.right >= b.left && a.right <= b.right)
        || (a.left <= b.left && a.right >= b.right);
    let vertical = (a.top >= b.top && a.top <= b.bottom)
        || (a.bottom >= b.top && a.bottom <= b.bottom)
        || (a.top <= b.top && a.bottom >= b.bottom);
    horizontal && vertical
}

/// Ids of `kind` elements that intersect `rect`, in registration order.
#[must_use]
pub fn hit_test(rect: &Rect, registry: &ElementRegistry, kind: EntityKind) -> Vec<String> {
    registry
        .elements(kind)
        .iter()
        .filter(|e| is_inside(&e.bounds, rect))
        .map(|e| e.id.clone())
        .collect()
}
