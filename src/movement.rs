//! Item drag and resize state machine.
//!
//! Each item gets an [`InteractionState`] the first time a pointer-down lands on
//! it. At most one state is active (moving or resizing) at a time. Every
//! pointer-move maps the pointer to a candidate time, runs it through the snap
//! policy and the collision detector, and commits the result to the chart state.
//! Pointer-up ends every gesture, not only the one under the cursor.
//!
//! ```text
//! Idle --label down--> Moving   --up--> Idle
//! Idle --resizer down--> Resizing --up--> Idle
//! ```

#[cfg(test)]
#[path = "movement_test.rs"]
mod movement_test;

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::collision::CollisionDetector;
use crate::config::MovementConfig;
use crate::consts::GHOST_OPACITY;
use crate::coords::{Point, Rect, row_index_at};
use crate::ghost::{GhostFactory, GhostProxy};
use crate::input::Button;
use crate::snap::SnapPolicy;
use crate::state::{ChartState, Item, ItemId, ItemTime, Moveable, Row, RowId};

/// Effective permissions and snapping for one gesture, resolved at pointer-down.
#[derive(Debug, Clone)]
pub struct GesturePolicy {
    pub moveable: Moveable,
    pub resizeable: bool,
    pub snap: SnapPolicy,
}

impl GesturePolicy {
    /// Resolve item > row > global for every policy at once.
    #[must_use]
    pub fn resolve(config: &MovementConfig, row: &Row, item: &Item) -> Self {
        Self {
            moveable: resolve_moveable(config, row, item),
            resizeable: resolve_resizeable(config, row, item),
            snap: config.snap.resolve(Some(&row.snap), Some(&item.snap)),
        }
    }
}

/// Effective movement permission: global off wins, then the item's override,
/// then the row's, then free movement.
#[must_use]
pub fn resolve_moveable(config: &MovementConfig, row: &Row, item: &Item) -> Moveable {
    if !config.moveable {
        return Moveable::No;
    }
    if let Some(m) = &item.moveable {
        return m.clone();
    }
    match row.moveable {
        Some(false) => Moveable::No,
        _ => Moveable::Yes,
    }
}

/// Effective resize permission. Any explicit `false` (global, row or item)
/// disables resizing; an item's `true` cannot lift a row's `false`.
#[must_use]
pub fn resolve_resizeable(config: &MovementConfig, row: &Row, item: &Item) -> bool {
    config.resizeable && item.resizeable != Some(false) && row.resizeable != Some(false)
}

/// Per-item transient gesture state.
pub struct InteractionState {
    pub moving: bool,
    pub resizing: bool,
    /// Viewport top captured at pointer-down, absolute pixels.
    pub gantt_top: f64,
    /// Viewport left captured at pointer-down, absolute pixels.
    pub gantt_left: f64,
    /// Distance from the anchored item edge to the pointer, in pixels.
    pub item_left_compensation: f64,
    /// Distance from the row's top to the pointer, in pixels.
    pub item_top: f64,
    /// Chart scroll compensation captured at pointer-down.
    pub scroll_compensation: f64,
    ghost: Option<Box<dyn GhostProxy>>,
    policy: Option<GesturePolicy>,
}

impl InteractionState {
    fn new() -> Self {
        Self {
            moving: false,
            resizing: false,
            gantt_top: 0.0,
            gantt_left: 0.0,
            item_left_compensation: 0.0,
            item_top: 0.0,
            scroll_compensation: 0.0,
            ghost: None,
            policy: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.moving || self.resizing
    }

    #[must_use]
    pub fn has_ghost(&self) -> bool {
        self.ghost.is_some()
    }

    /// Policy resolved at the last pointer-down, if any.
    #[must_use]
    pub fn policy(&self) -> Option<&GesturePolicy> {
        self.policy.as_ref()
    }

    fn end(&mut self) {
        self.moving = false;
        self.resizing = false;
        if let Some(mut ghost) = self.ghost.take() {
            ghost.release();
        }
    }
}

impl fmt::Debug for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionState")
            .field("moving", &self.moving)
            .field("resizing", &self.resizing)
            .field("gantt_top", &self.gantt_top)
            .field("gantt_left", &self.gantt_left)
            .field("item_left_compensation", &self.item_left_compensation)
            .field("item_top", &self.item_top)
            .field("scroll_compensation", &self.scroll_compensation)
            .field("ghost", &self.ghost.is_some())
            .finish_non_exhaustive()
    }
}

/// A committed change to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Start and end were rewritten together.
    Time { id: ItemId, time: ItemTime },
    /// The item moved to another row.
    Row { id: ItemId, from: RowId, to: RowId },
}

/// Drag/resize engine owning every item's interaction state.
pub struct ItemMovement {
    config: MovementConfig,
    states: HashMap<ItemId, InteractionState>,
    ghosts: Option<Box<dyn GhostFactory>>,
}

impl fmt::Debug for ItemMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemMovement")
            .field("config", &self.config)
            .field("states", &self.states)
            .field("ghosts", &self.ghosts.is_some())
            .finish()
    }
}

impl ItemMovement {
    #[must_use]
    pub fn new(config: MovementConfig) -> Self {
        Self { config, states: HashMap::new(), ghosts: None }
    }

    /// Install the factory used to spawn ghost proxies.
    pub fn set_ghost_factory(&mut self, factory: Box<dyn GhostFactory>) {
        self.ghosts = Some(factory);
    }

    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Interaction state for `item_id`, if a pointer-down ever reached it.
    #[must_use]
    pub fn state(&self, item_id: &str) -> Option<&InteractionState> {
        self.states.get(item_id)
    }

    /// Id of the item currently being moved or resized.
    #[must_use]
    pub fn active_item(&self) -> Option<&str> {
        self.states
            .iter()
            .find(|(_, s)| s.is_active())
            .map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_item().is_some()
    }

    /// Pointer-down on an item's label. Returns `true` if a move started.
    pub fn on_label_down(&mut self, state: &ChartState, item_id: &str, pointer: Point, button: Button) -> bool {
        if button != Button::Primary || !self.config.moveable {
            return false;
        }
        let Some((item, row)) = lookup(state, item_id) else {
            return false;
        };
        let policy = GesturePolicy::resolve(&self.config, row, item);
        if policy.moveable == Moveable::No {
            trace!(item = %item_id, "movement: item is not moveable");
            return false;
        }

        let viewport = state.viewport;
        let item_x = viewport.time_to_pixel(item.time.start).round();
        let item_width = viewport.time_to_pixel(item.time.end) - viewport.time_to_pixel(item.time.start);
        let row_top = row.top + state.scroll_compensation;
        let local = viewport.to_chart_local(pointer);

        self.end_all();
        let spawn_ghost = self.config.ghost;
        let movement = self.states.entry(item_id.to_string()).or_insert_with(InteractionState::new);
        movement.moving = true;
        movement.gantt_left = viewport.origin.x;
        movement.gantt_top = viewport.origin.y;
        movement.item_left_compensation = local.x - item_x;
        movement.item_top = local.y - row_top;
        movement.scroll_compensation = state.scroll_compensation;
        movement.policy = Some(policy);
        if spawn_ghost && movement.ghost.is_none() {
            if let Some(factory) = self.ghosts.as_mut() {
                let bounds = Rect::from_origin_size(Point::new(item_x, row_top), item_width, row.height);
                movement.ghost = Some(factory.spawn(item_id, bounds, GHOST_OPACITY));
            }
        }
        debug!(item = %item_id, start = item.time.start, "movement: move started");
        true
    }

    /// Pointer-down on an item's resize handle. Returns `true` if a resize started.
    pub fn on_resizer_down(&mut self, state: &ChartState, item_id: &str, pointer: Point, button: Button) -> bool {
        if button != Button::Primary || !self.config.resizeable {
            return false;
        }
        let Some((item, row)) = lookup(state, item_id) else {
            return false;
        };
        let policy = GesturePolicy::resolve(&self.config, row, item);
        if !policy.resizeable {
            trace!(item = %item_id, "movement: item is not resizeable");
            return false;
        }

        let viewport = state.viewport;
        let item_x = viewport.time_to_pixel(item.time.end);
        let local = viewport.to_chart_local(pointer);

        self.end_all();
        let movement = self.states.entry(item_id.to_string()).or_insert_with(InteractionState::new);
        movement.resizing = true;
        movement.gantt_left = viewport.origin.x;
        movement.gantt_top = viewport.origin.y;
        movement.item_left_compensation = local.x - item_x;
        movement.policy = Some(policy);
        debug!(item = %item_id, end = item.time.end, "movement: resize started");
        true
    }

    /// Pointer-move anywhere. Applies and returns the mutations it committed.
    pub fn on_pointer_move(&mut self, state: &mut ChartState, pointer: Point) -> Vec<Mutation> {
        let Self { config, states, .. } = self;
        let Some((item_id, movement)) = states.iter_mut().find(|(_, s)| s.is_active()) else {
            return Vec::new();
        };
        let Some(item) = state.item(item_id).cloned() else {
            warn!(item = %item_id, "movement: active item vanished from the chart");
            return Vec::new();
        };
        let Some(policy) = movement.policy.clone() else {
            return Vec::new();
        };
        if movement.moving {
            move_item(config, movement, &policy, state, &item, pointer)
        } else if policy.resizeable {
            resize_item(config, movement, &policy, state, &item, pointer).into_iter().collect()
        } else {
            Vec::new()
        }
    }

    /// Pointer-up anywhere. Ends every gesture and releases every ghost.
    ///
    /// Returns the ids whose gesture was active. Idempotent.
    pub fn on_pointer_up(&mut self) -> Vec<ItemId> {
        let ended: Vec<ItemId> = self
            .states
            .iter()
            .filter(|(_, s)| s.is_active())
            .map(|(id, _)| id.clone())
            .collect();
        self.end_all();
        if !ended.is_empty() {
            debug!(count = ended.len(), "movement: gesture ended");
        }
        ended
    }

    /// Drop the interaction state of an item that left the chart.
    pub fn forget(&mut self, item_id: &str) {
        if let Some(mut movement) = self.states.remove(item_id) {
            movement.end();
        }
    }

    fn end_all(&mut self) {
        for movement in self.states.values_mut() {
            movement.end();
        }
    }
}

fn lookup<'a>(state: &'a ChartState, item_id: &str) -> Option<(&'a Item, &'a Row)> {
    let Some(item) = state.item(item_id) else {
        warn!(item = %item_id, "movement: pointer-down on unknown item");
        return None;
    };
    let Some(row) = state.row(&item.row_id) else {
        warn!(item = %item_id, row = %item.row_id, "movement: item references unknown row");
        return None;
    };
    Some((item, row))
}

/// Outcome of snapping and checking one candidate time change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Snapping cancelled the change; collision was not consulted.
    Unchanged,
    /// The candidate collides, leaves the chart or inverts the item.
    Rejected,
    Accepted(ItemTime),
}

/// Judge a horizontal move of `item` so that its start lands at pixel `left`.
fn judge_move(config: &MovementConfig, policy: &GesturePolicy, state: &ChartState, item: &Item, left: f64) -> Verdict {
    let add = state.viewport.pixel_to_time(left) - item.time.start;
    let final_add = policy.snap.snap_start(item.time.start, add) - item.time.start;
    if final_add == 0 {
        return Verdict::Unchanged;
    }
    let start = item.time.start + final_add;
    if CollisionDetector::new(state, config).is_collision(&item.row_id, &item.id, start, item.time.end + final_add) {
        return Verdict::Rejected;
    }
    Verdict::Accepted(ItemTime::new(start, policy.snap.snap_end(item.time.end, final_add) - 1))
}

/// Judge a resize of `item` so that its end lands at pixel `left`.
fn judge_resize(config: &MovementConfig, policy: &GesturePolicy, state: &ChartState, item: &Item, left: f64) -> Verdict {
    let add = state.viewport.pixel_to_time(left) - item.time.end;
    if item.time.end + add < item.time.start {
        return Verdict::Rejected;
    }
    let final_end = policy.snap.snap_end(item.time.end, add) - 1;
    if final_end == item.time.end {
        return Verdict::Unchanged;
    }
    if CollisionDetector::new(state, config).is_collision(&item.row_id, &item.id, item.time.start, final_end) {
        return Verdict::Rejected;
    }
    Verdict::Accepted(ItemTime::new(policy.snap.snap_start(item.time.start, 0), final_end))
}

/// Horizontal then vertical movement. The row change must fit the target row
/// both at the item's interval before this event and at the one just committed.
fn move_item(
    config: &MovementConfig,
    movement: &mut InteractionState,
    policy: &GesturePolicy,
    state: &mut ChartState,
    item: &Item,
    pointer: Point,
) -> Vec<Mutation> {
    let mut out = Vec::new();
    let left = pointer.x - movement.gantt_left - movement.item_left_compensation;
    let top = pointer.y - movement.gantt_top;
    if let Some(ghost) = movement.ghost.as_mut() {
        let scrolled = state.scroll_compensation - movement.scroll_compensation;
        ghost.position(Point::new(left, top - movement.item_top + scrolled));
    }

    let mut committed = None;
    if policy.moveable.allows_time(&item.row_id) {
        match judge_move(config, policy, state, item, left) {
            Verdict::Unchanged => trace!(item = %item.id, "movement: snapped delta is zero"),
            Verdict::Rejected => trace!(item = %item.id, "movement: move rejected by collision"),
            Verdict::Accepted(time) => {
                state.set_item_time(&item.id, time);
                debug!(item = %item.id, start = time.start, end = time.end, "movement: item moved");
                out.push(Mutation::Time { id: item.id.clone(), time });
                committed = Some(time);
            }
        }
    }

    if !policy.moveable.allows_rows() {
        return out;
    }
    let target = {
        let rows = state.visible_rows();
        let tops: Vec<f64> = rows.iter().map(|r| r.top).collect();
        row_index_at(top, &tops, state.scroll_compensation)
            .and_then(|index| rows.get(index))
            .map(|row| (row.id.clone(), row.moveable))
    };
    let Some((target_id, target_moveable)) = target else {
        return out;
    };
    if target_id == item.row_id || !policy.moveable.allows_row(&target_id) || target_moveable == Some(false) {
        return out;
    }
    let detector = CollisionDetector::new(state, config);
    let collides = detector.is_collision(&target_id, &item.id, item.time.start, item.time.end)
        || committed.is_some_and(|time| detector.is_collision(&target_id, &item.id, time.start, time.end));
    if collides {
        trace!(item = %item.id, row = %target_id, "movement: row change rejected by collision");
        return out;
    }
    state.set_item_row(&item.id, &target_id);
    debug!(item = %item.id, from = %item.row_id, to = %target_id, "movement: item changed row");
    out.push(Mutation::Row { id: item.id.clone(), from: item.row_id.clone(), to: target_id });
    out
}

/// Move the end of `item` toward the pointer, keeping the start (re-snapped).
fn resize_item(
    config: &MovementConfig,
    movement: &InteractionState,
    policy: &GesturePolicy,
    state: &mut ChartState,
    item: &Item,
    pointer: Point,
) -> Option<Mutation> {
    let left = pointer.x - movement.gantt_left - movement.item_left_compensation;
    match judge_resize(config, policy, state, item, left) {
        Verdict::Unchanged => {
            trace!(item = %item.id, "movement: snapped delta is zero");
            None
        }
        Verdict::Rejected => {
            trace!(item = %item.id, "movement: resize rejected");
            None
        }
        Verdict::Accepted(time) => {
            state.set_item_time(&item.id, time);
            debug!(item = %item.id, start = time.start, end = time.end, "movement: item resized");
            Some(Mutation::Time { id: item.id.clone(), time })
        }
    }
}
