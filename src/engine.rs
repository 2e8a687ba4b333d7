use tracing::debug;

use crate::config::Config;
use crate::coords::{Point, Rect, Viewport};
use crate::error::TimelineError;
use crate::ghost::GhostFactory;
use crate::grid::PeriodDate;
use crate::hold::HoldDetector;
use crate::input::{Button, PointerTarget};
use crate::movement::{ItemMovement, Mutation};
use crate::selection::{NoopHooks, RectangleSelection, SelectionHooks, SelectionState};
use crate::state::{ChartSnapshot, ChartState, Item, ItemId, ItemTime, RowId};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// An item's start and end were committed.
    ItemTimeChanged { id: ItemId, time: ItemTime },
    /// An item moved to another row.
    ItemRowChanged { id: ItemId, from: RowId, to: RowId },
    /// A move or resize gesture on this item ended.
    GestureEnded { id: ItemId },
    /// The selection sets or selection flags were rewritten.
    SelectionChanged,
    /// A long-press completed on this item.
    HoldTriggered { id: ItemId },
    /// A pointer-move was queued; call `on_frame` on the next display refresh.
    FrameRequested,
    RenderNeeded,
}

impl From<Mutation> for Action {
    fn from(m: Mutation) -> Self {
        match m {
            Mutation::Time { id, time } => Self::ItemTimeChanged { id, time },
            Mutation::Row { id, from, to } => Self::ItemRowChanged { id, from, to },
        }
    }
}

/// Timeline interaction engine: chart state plus every pointer state machine.
///
/// The host wires its raw input to `on_pointer_down` / `on_pointer_move` /
/// `on_pointer_up`, calls `on_frame` once per display refresh (or fixed interval),
/// and reacts to the returned [`Action`]s.
pub struct TimelineEngine {
    pub state: ChartState,
    pub movement: ItemMovement,
    pub selection: RectangleSelection,
    pub hold: HoldDetector,
    hooks: Box<dyn SelectionHooks>,
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl TimelineEngine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_state(config, ChartState::new())
    }

    #[must_use]
    pub fn with_state(config: Config, state: ChartState) -> Self {
        Self {
            state,
            movement: ItemMovement::new(config.movement),
            selection: RectangleSelection::new(config.selection),
            hold: HoldDetector::new(config.hold),
            hooks: Box::new(NoopHooks),
        }
    }

    /// Build an engine from JSON configuration and a JSON chart snapshot.
    pub fn from_json(config: &str, state: &str) -> Result<Self, TimelineError> {
        Ok(Self::with_state(Config::from_json(config)?, ChartState::from_json(state)?))
    }

    /// Install selection callbacks.
    pub fn set_hooks(&mut self, hooks: Box<dyn SelectionHooks>) {
        self.hooks = hooks;
    }

    /// Install the ghost proxy factory.
    pub fn set_ghost_factory(&mut self, factory: Box<dyn GhostFactory>) {
        self.movement.set_ghost_factory(factory);
    }

    // --- Data inputs ---

    /// Replace chart data with a snapshot.
    pub fn load_snapshot(&mut self, snapshot: ChartSnapshot) -> Result<(), TimelineError> {
        self.state.load_snapshot(snapshot)
    }

    /// Insert or replace an item.
    pub fn upsert_item(&mut self, item: Item) {
        self.state.insert_item(item);
    }

    /// Remove an item and any gesture or hold attached to it.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        self.movement.forget(id);
        self.hold.cancel(id);
        self.state.remove_item(id)
    }

    /// Update the viewport after layout, scroll or zoom.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    /// Update the virtualized-scroll compensation.
    pub fn set_scroll_compensation(&mut self, compensation: f64) {
        self.state.scroll_compensation = compensation;
    }

    /// Rebuild grid blocks for the visible rows.
    pub fn regenerate_grid(&mut self, periods: &[PeriodDate]) {
        self.state.regenerate_grid(periods);
    }

    // --- Input events ---

    /// Primary entry point for a button press. `now_ms` feeds hold detection.
    pub fn on_pointer_down(&mut self, pointer: Point, button: Button, target: PointerTarget, now_ms: u64) -> Vec<Action> {
        match target {
            PointerTarget::Surface => {
                if self.selection.on_pointer_down(&mut self.state, pointer, button) {
                    vec![Action::SelectionChanged, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            PointerTarget::ItemLabel(id) => {
                self.hold.on_pointer_down(&id, pointer, now_ms);
                if !self.movement.config().is_enabled() {
                    return Vec::new();
                }
                if self.movement.on_label_down(&self.state, &id, pointer, button) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            PointerTarget::ItemResizer(id) => {
                self.hold.on_pointer_down(&id, pointer, now_ms);
                if !self.movement.config().is_enabled() {
                    return Vec::new();
                }
                if self.movement.on_resizer_down(&self.state, &id, pointer, button) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Pointer moved. Item gestures apply immediately; selection waits for `on_frame`.
    pub fn on_pointer_move(&mut self, pointer: Point) -> Vec<Action> {
        self.hold.on_pointer_move(pointer);
        let mut actions: Vec<Action> = self
            .movement
            .on_pointer_move(&mut self.state, pointer)
            .into_iter()
            .map(Action::from)
            .collect();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        if self.selection.on_pointer_move(pointer) {
            actions.push(Action::FrameRequested);
        }
        actions
    }

    /// Button released anywhere.
    ///
    /// A release that ends an item gesture is consumed by it. Otherwise the
    /// selection commits a live rectangle or clears itself.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.hold.on_pointer_up();
        let ended = self.movement.on_pointer_up();
        if !ended.is_empty() {
            let mut actions: Vec<Action> = ended.into_iter().map(|id| Action::GestureEnded { id }).collect();
            actions.push(Action::RenderNeeded);
            return actions;
        }
        self.selection.on_pointer_up(&mut self.state, self.hooks.as_mut());
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// One display refresh: run the coalesced selection pass and resolve holds.
    pub fn on_frame(&mut self, now_ms: u64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.selection.on_frame(&mut self.state, self.hooks.as_mut()) {
            actions.push(Action::SelectionChanged);
            actions.push(Action::RenderNeeded);
        }
        for id in self.hold.poll(now_ms) {
            debug!(item = %id, "engine: hold action");
            actions.push(Action::HoldTriggered { id });
        }
        actions
    }

    // --- Queries ---

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.state.item(id)
    }

    /// Current selection sets.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.state.selection
    }

    /// Selection rectangle to draw, if any.
    #[must_use]
    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection.visible_rect()
    }

    /// Item currently being moved or resized.
    #[must_use]
    pub fn active_item(&self) -> Option<&str> {
        self.movement.active_item()
    }
}
