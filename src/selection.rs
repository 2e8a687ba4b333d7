//! Rectangle multi-selection.
//!
//! A primary-button drag on the selection surface draws a rectangle in
//! chart-local pixels. While it is live, every frame re-tests the rendered
//! elements of each enabled [`EntityKind`] against it and replaces the
//! `selecting` set. Releasing the pointer promotes `selecting` to `selected`.
//! A release with no drag in progress clears the selection.
//!
//! The flow mirrors the seed / apply / commit lifecycle of interactive drags:
//!
//! 1. **Seed** (pointer-down): snapshot the committed selection, clear everything
//!    and anchor the rectangle.
//! 2. **Apply** (frame): hit-test and rewrite `selecting`, firing `selecting` /
//!    `deselecting` hooks for entities entering or leaving it.
//! 3. **Commit** (pointer-up): promote, and fire `selected` / `deselected` for grid
//!    blocks whose committed membership actually changed.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SelectionConfig;
use crate::coords::{Point, Rect};
use crate::hit::{EntityKind, hit_test};
use crate::input::Button;
use crate::schedule::Coalescer;
use crate::state::ChartState;

/// Callbacks fired as entities change selection status. All default to no-ops.
pub trait SelectionHooks {
    /// `id` entered the live rectangle.
    fn selecting(&mut self, _id: &str, _kind: EntityKind) {}
    /// `id` left the live rectangle, or left `selecting` on commit.
    fn deselecting(&mut self, _id: &str, _kind: EntityKind) {}
    /// `id` became part of the committed selection.
    fn selected(&mut self, _id: &str, _kind: EntityKind) {}
    /// `id` was dropped from the committed selection.
    fn deselected(&mut self, _id: &str, _kind: EntityKind) {}
}

/// Hooks that ignore every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl SelectionHooks for NoopHooks {}

/// Entity ids per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySets {
    #[serde(rename = "chart-timeline-grid-rows", default)]
    pub grid_rows: Vec<String>,
    #[serde(rename = "chart-timeline-grid-row-blocks", default)]
    pub grid_row_blocks: Vec<String>,
    #[serde(rename = "chart-timeline-items-rows", default)]
    pub items_rows: Vec<String>,
    #[serde(rename = "chart-timeline-items-row-items", default)]
    pub items: Vec<String>,
}

impl EntitySets {
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::GridRow => &self.grid_rows,
            EntityKind::GridRowBlock => &self.grid_row_blocks,
            EntityKind::ItemsRow => &self.items_rows,
            EntityKind::Item => &self.items,
        }
    }

    pub fn set(&mut self, kind: EntityKind, ids: Vec<String>) {
        match kind {
            EntityKind::GridRow => self.grid_rows = ids,
            EntityKind::GridRowBlock => self.grid_row_blocks = ids,
            EntityKind::ItemsRow => self.items_rows = ids,
            EntityKind::Item => self.items = ids,
        }
    }

    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.get(kind).iter().any(|i| i == id)
    }

    /// Total number of ids across kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        EntityKind::ALL.iter().map(|k| self.get(*k).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provisional and committed selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Entities under the live rectangle.
    pub selecting: EntitySets,
    /// Entities committed by the last completed drag.
    pub selected: EntitySets,
}

impl SelectionState {
    /// Whether a grid block is in the committed selection.
    #[must_use]
    pub fn is_block_selected(&self, block_id: &str) -> bool {
        self.selected.contains(EntityKind::GridRowBlock, block_id)
    }
}

/// The drag rectangle in chart-local pixels, normalized so `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// A drag is in progress.
    pub active: bool,
    /// The rectangle has been extended at least once and should be drawn.
    pub visible: bool,
}

impl SelectionRect {
    /// Start a drag anchored at `local`.
    fn anchor(&mut self, local: Point) {
        *self = Self {
            from_x: local.x,
            from_y: local.y,
            to_x: local.x,
            to_y: local.y,
            start_x: local.x,
            start_y: local.y,
            active: true,
            visible: false,
        };
    }

    /// Stretch the rectangle from its anchor to `local`, swapping corners as needed.
    /// A disabled axis stays pinned to the anchor.
    fn extend_to(&mut self, local: Point, horizontal: bool, vertical: bool) {
        let x = if horizontal { local.x } else { self.start_x };
        let y = if vertical { local.y } else { self.start_y };
        (self.from_x, self.to_x) = if x <= self.start_x { (x, self.start_x) } else { (self.start_x, x) };
        (self.from_y, self.to_y) = if y <= self.start_y { (y, self.start_y) } else { (self.start_y, y) };
        self.visible = true;
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.from_x, self.from_y, self.to_x, self.to_y)
    }
}

/// Rectangle selection state machine (`Idle -> Selecting -> Idle`).
#[derive(Debug, Default)]
pub struct RectangleSelection {
    config: SelectionConfig,
    rect: SelectionRect,
    previous: SelectionState,
    pending: Coalescer<Point>,
}

impl RectangleSelection {
    #[must_use]
    pub fn new(config: SelectionConfig) -> Self {
        Self { config, ..Self::default() }
    }

    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Whether a rectangle drag is in progress.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.rect.active
    }

    /// Rectangle to draw, if one is showing.
    #[must_use]
    pub fn visible_rect(&self) -> Option<Rect> {
        (self.rect.active && self.rect.visible).then(|| self.rect.bounds())
    }

    /// Current rectangle state.
    #[must_use]
    pub fn rect(&self) -> &SelectionRect {
        &self.rect
    }

    /// Pointer-down on the selection surface. Returns `true` if a drag started.
    pub fn on_pointer_down(&mut self, state: &mut ChartState, pointer: Point, button: Button) -> bool {
        if button != Button::Primary {
            return false;
        }
        let local = state.viewport.to_chart_local(pointer);
        self.rect.anchor(local);
        self.previous = state.selection.clone();
        self.pending.cancel();
        clear_selection(state);
        debug!(x = local.x, y = local.y, "selection: drag started");
        true
    }

    /// Queue a pointer-move for the next frame. Returns `true` when the host
    /// should request a frame.
    pub fn on_pointer_move(&mut self, pointer: Point) -> bool {
        if !self.rect.active {
            return false;
        }
        self.pending.push(pointer)
    }

    /// Process the latest queued move. Returns `true` if `selecting` was rewritten.
    pub fn on_frame(&mut self, state: &mut ChartState, hooks: &mut dyn SelectionHooks) -> bool {
        let Some(pointer) = self.pending.take() else {
            return false;
        };
        self.select(state, hooks, pointer)
    }

    /// Pointer-up anywhere. Commits a live drag, otherwise clears the selection.
    pub fn on_pointer_up(&mut self, state: &mut ChartState, hooks: &mut dyn SelectionHooks) {
        self.pending.cancel();
        if !self.rect.active {
            clear_selection(state);
            return;
        }
        self.rect.active = false;
        self.rect.visible = false;
        self.commit(state, hooks);
    }

    fn select(&mut self, state: &mut ChartState, hooks: &mut dyn SelectionHooks, pointer: Point) -> bool {
        if !self.rect.active {
            return false;
        }
        let local = state.viewport.to_chart_local(pointer);
        self.rect.extend_to(local, self.config.horizontal, self.config.vertical);
        let bounds = self.rect.bounds();

        let mut now = EntitySets::default();
        for kind in EntityKind::ALL {
            if !self.config.enabled(kind) {
                continue;
            }
            let hits = hit_test(&bounds, &state.elements, kind);
            let current = state.selection.selecting.get(kind);
            for id in hits.iter().filter(|id| !current.contains(*id)) {
                hooks.selecting(id, kind);
            }
            for element in state.elements.elements(kind) {
                if current.contains(&element.id) && !hits.contains(&element.id) {
                    hooks.deselecting(&element.id, kind);
                }
            }
            now.set(kind, hits);
        }

        for item in state.items_mut() {
            item.selecting = now.contains(EntityKind::Item, &item.id);
        }
        for row in &mut state.grid {
            row.selecting = now.contains(EntityKind::GridRow, &row.row_id);
            for block in &mut row.blocks {
                block.selecting = now.contains(EntityKind::GridRowBlock, &block.id);
            }
        }
        state.selection.selecting = now;
        true
    }

    fn commit(&mut self, state: &mut ChartState, hooks: &mut dyn SelectionHooks) {
        let promoted = std::mem::take(&mut state.selection.selecting);

        for kind in EntityKind::ALL {
            for element in state.elements.elements(kind) {
                if promoted.contains(kind, &element.id) {
                    hooks.deselecting(&element.id, kind);
                }
            }
        }

        for item in state.items_mut() {
            item.selecting = false;
            item.selected = promoted.contains(EntityKind::Item, &item.id);
        }

        let before = &self.previous.selected;
        for row in &mut state.grid {
            row.selecting = false;
            row.selected = promoted.contains(EntityKind::GridRow, &row.row_id);
            for block in &mut row.blocks {
                let now_selected = promoted.contains(EntityKind::GridRowBlock, &block.id);
                let was_selected = before.contains(EntityKind::GridRowBlock, &block.id);
                if now_selected && !was_selected {
                    hooks.selected(&block.id, EntityKind::GridRowBlock);
                } else if !now_selected && was_selected {
                    hooks.deselected(&block.id, EntityKind::GridRowBlock);
                }
                block.selecting = false;
                block.selected = now_selected;
            }
        }

        debug!(
            items = promoted.items.len(),
            blocks = promoted.grid_row_blocks.len(),
            rows = promoted.items_rows.len() + promoted.grid_rows.len(),
            "selection: committed"
        );
        state.selection.selected = promoted;
    }
}

/// Empty both selection sets and every selection flag in the store.
pub fn clear_selection(state: &mut ChartState) {
    state.selection = SelectionState::default();
    for item in state.items_mut() {
        item.selecting = false;
        item.selected = false;
    }
    for row in &mut state.grid {
        row.selecting = false;
        row.selected = false;
        for block in &mut row.blocks {
            block.selecting = false;
            block.selected = false;
        }
    }
}
