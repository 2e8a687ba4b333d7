//! Chart state: items, rows, time axis and the render-layer registries.
//!
//! This is the engine's view of the shared chart store. The host loads it from a
//! snapshot (`ChartState::from_json`) or builds it up directly, keeps the
//! viewport and rendered-element registry current, and reads back item times,
//! rows and selection flags after each pointer event.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coords::Viewport;
use crate::error::TimelineError;
use crate::grid::{BlockHook, GridRow, PeriodDate, generate_blocks};
use crate::hit::ElementRegistry;
use crate::selection::SelectionState;
use crate::snap::SnapOverride;

/// Unique identifier for an item.
pub type ItemId = String;

/// Unique identifier for a row.
pub type RowId = String;

/// Item time span in absolute milliseconds. `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTime {
    pub start: i64,
    pub end: i64,
}

impl ItemTime {
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Duration under the inclusive-end convention.
    #[must_use]
    pub fn duration(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// Movement permission for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMoveable", into = "RawMoveable")]
pub enum Moveable {
    /// Cannot be moved.
    No,
    /// Free movement in time and across rows.
    Yes,
    /// Time-only movement (`"x"`); the row never changes.
    Horizontal,
    /// Movement only while in, and into, the listed rows.
    Rows(Vec<RowId>),
}

impl Moveable {
    /// Whether the item may move in time while sitting in `row_id`.
    #[must_use]
    pub fn allows_time(&self, row_id: &str) -> bool {
        match self {
            Self::No => false,
            Self::Yes | Self::Horizontal => true,
            Self::Rows(rows) => rows.iter().any(|r| r == row_id),
        }
    }

    /// Whether the item may be moved across rows at all.
    #[must_use]
    pub fn allows_rows(&self) -> bool {
        matches!(self, Self::Yes | Self::Rows(_))
    }

    /// Whether the item may be moved into `row_id`.
    #[must_use]
    pub fn allows_row(&self, row_id: &str) -> bool {
        match self {
            Self::Yes => true,
            Self::Rows(rows) => rows.iter().any(|r| r == row_id),
            Self::No | Self::Horizontal => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMoveable {
    Flag(bool),
    Axis(String),
    Rows(Vec<RowId>),
}

impl TryFrom<RawMoveable> for Moveable {
    type Error = TimelineError;

    fn try_from(raw: RawMoveable) -> Result<Self, Self::Error> {
        match raw {
            RawMoveable::Flag(true) => Ok(Self::Yes),
            RawMoveable::Flag(false) => Ok(Self::No),
            RawMoveable::Axis(axis) if axis == "x" => Ok(Self::Horizontal),
            RawMoveable::Axis(other) => Err(TimelineError::InvalidMoveable(other)),
            RawMoveable::Rows(rows) => Ok(Self::Rows(rows)),
        }
    }
}

impl From<Moveable> for RawMoveable {
    fn from(m: Moveable) -> Self {
        match m {
            Moveable::No => Self::Flag(false),
            Moveable::Yes => Self::Flag(true),
            Moveable::Horizontal => Self::Axis("x".into()),
            Moveable::Rows(rows) => Self::Rows(rows),
        }
    }
}

/// A chart item (task).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub row_id: RowId,
    pub time: ItemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moveable: Option<Moveable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizeable: Option<bool>,
    #[serde(default)]
    pub selecting: bool,
    #[serde(default)]
    pub selected: bool,
    /// Per-item snap functions. Set programmatically; never serialized.
    #[serde(skip)]
    pub snap: SnapOverride,
}

impl Item {
    #[must_use]
    pub fn new(id: impl Into<ItemId>, row_id: impl Into<RowId>, start: i64, end: i64) -> Self {
        Self {
            id: id.into(),
            row_id: row_id.into(),
            time: ItemTime::new(start, end),
            moveable: None,
            resizeable: None,
            selecting: false,
            selected: false,
            snap: SnapOverride::default(),
        }
    }
}

/// A chart row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    /// Top edge in chart-local pixels, before scroll compensation.
    pub top: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moveable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizeable: Option<bool>,
    /// Per-row snap functions. Set programmatically; never serialized.
    #[serde(skip)]
    pub snap: SnapOverride,
}

impl Row {
    #[must_use]
    pub fn new(id: impl Into<RowId>, top: f64, height: f64) -> Self {
        Self { id: id.into(), top, height, moveable: None, resizeable: None, snap: SnapOverride::default() }
    }
}

/// Global time bounds of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTime {
    /// Earliest time shown on the chart.
    pub from: i64,
    /// Latest time shown on the chart.
    pub to: i64,
    /// Zoom level as reported by the time axis.
    pub zoom: i32,
}

impl Default for ChartTime {
    fn default() -> Self {
        Self { from: i64::MIN, to: i64::MAX, zoom: 0 }
    }
}

/// Serialized form of the chart state accepted by [`ChartState::from_json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartSnapshot {
    pub items: Vec<Item>,
    pub rows: Vec<Row>,
    /// Ordered visible row ids. When absent all rows are visible, ordered by `top`.
    pub visible_rows: Option<Vec<RowId>>,
    pub time: ChartTime,
    pub viewport: Viewport,
    pub scroll_compensation: f64,
}

/// In-memory chart store.
#[derive(Debug, Default)]
pub struct ChartState {
    items: HashMap<ItemId, Item>,
    rows: HashMap<RowId, Row>,
    visible_rows: Vec<RowId>,
    pub time: ChartTime,
    pub viewport: Viewport,
    /// Vertical offset applied by virtualized row scrolling.
    pub scroll_compensation: f64,
    /// Grid rows with their blocks, rebuilt by [`ChartState::regenerate_grid`].
    pub grid: Vec<GridRow>,
    /// Hooks run on every newly generated grid block.
    pub block_hooks: Vec<BlockHook>,
    /// Elements the render layer currently shows, for hit-testing.
    pub elements: ElementRegistry,
    pub selection: SelectionState,
}

impl ChartState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a [`ChartSnapshot`] and build a state from it.
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let snapshot: ChartSnapshot =
            serde_json::from_str(json).map_err(|e| TimelineError::StateParse(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Build a state from a snapshot, checking that every item's row exists.
    pub fn from_snapshot(snapshot: ChartSnapshot) -> Result<Self, TimelineError> {
        let mut state = Self::new();
        state.load_snapshot(snapshot)?;
        Ok(state)
    }

    /// Replace items, rows and time settings with a snapshot. Selection is kept.
    pub fn load_snapshot(&mut self, snapshot: ChartSnapshot) -> Result<(), TimelineError> {
        let rows: HashMap<RowId, Row> = snapshot.rows.into_iter().map(|r| (r.id.clone(), r)).collect();
        if let Some(orphan) = snapshot.items.iter().find(|i| !rows.contains_key(&i.row_id)) {
            return Err(TimelineError::UnknownRow { item_id: orphan.id.clone(), row_id: orphan.row_id.clone() });
        }
        self.rows = rows;
        self.items = snapshot.items.into_iter().map(|i| (i.id.clone(), i)).collect();
        match snapshot.visible_rows {
            Some(visible) => self.set_visible_rows(visible),
            None => self.show_all_rows(),
        }
        self.time = snapshot.time;
        self.viewport = snapshot.viewport;
        self.scroll_compensation = snapshot.scroll_compensation;
        Ok(())
    }

    // --- Items ---

    /// Insert or replace an item.
    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        self.items.remove(id)
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    /// All items, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All items mutably, in no particular order.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.values_mut()
    }

    /// Items currently assigned to `row_id`.
    pub fn row_items<'a>(&'a self, row_id: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.values().filter(move |i| i.row_id == row_id)
    }

    /// Overwrite an item's time span. Returns false if the item doesn't exist.
    pub fn set_item_time(&mut self, id: &str, time: ItemTime) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        item.time = time;
        true
    }

    /// Reassign an item to another row. Returns false if the item doesn't exist.
    pub fn set_item_row(&mut self, id: &str, row_id: &str) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        item.row_id = row_id.to_string();
        true
    }

    /// Number of items in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // --- Rows ---

    /// Insert or replace a row. New rows are not made visible automatically.
    pub fn insert_row(&mut self, row: Row) {
        self.rows.insert(row.id.clone(), row);
    }

    #[must_use]
    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.get(id)
    }

    pub fn row_mut(&mut self, id: &str) -> Option<&mut Row> {
        self.rows.get_mut(id)
    }

    /// Set the ordered list of visible rows. Unknown ids are dropped.
    pub fn set_visible_rows(&mut self, ids: Vec<RowId>) {
        self.visible_rows = ids.into_iter().filter(|id| self.rows.contains_key(id)).collect();
    }

    /// Make every row visible, ordered by `top` (ties broken by id).
    pub fn show_all_rows(&mut self) {
        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by(|a, b| a.top.total_cmp(&b.top).then_with(|| a.id.cmp(&b.id)));
        self.visible_rows = rows.into_iter().map(|r| r.id.clone()).collect();
    }

    /// Visible rows in display order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visible_rows.iter().filter_map(|id| self.rows.get(id)).collect()
    }

    // --- Grid ---

    /// Rebuild the grid for the visible rows across `periods`.
    ///
    /// User hooks run first, then blocks already committed as selected are marked,
    /// so block selection survives scrolling and zooming.
    pub fn regenerate_grid(&mut self, periods: &[PeriodDate]) {
        let rows = self.visible_rows();
        let mut grid = generate_blocks(&rows, periods, &self.block_hooks);
        for row in &mut grid {
            for block in &mut row.blocks {
                block.selected = self.selection.is_block_selected(&block.id);
            }
        }
        self.grid = grid;
    }
}
