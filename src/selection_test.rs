#![allow(clippy::float_cmp)]

use super::*;
use crate::coords::Viewport;
use crate::grid::PeriodDate;
use crate::state::{Item, Row};

// =============================================================
// Helpers
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Selecting,
    Deselecting,
    Selected,
    Deselected,
}

#[derive(Default)]
struct Recorder {
    events: Vec<(Event, String, EntityKind)>,
}

impl Recorder {
    fn count(&self, event: Event) -> usize {
        self.events.iter().filter(|(e, _, _)| *e == event).count()
    }

    fn has(&self, event: Event, id: &str) -> bool {
        self.events.iter().any(|(e, i, _)| *e == event && i == id)
    }
}

impl SelectionHooks for Recorder {
    fn selecting(&mut self, id: &str, kind: EntityKind) {
        self.events.push((Event::Selecting, id.to_string(), kind));
    }
    fn deselecting(&mut self, id: &str, kind: EntityKind) {
        self.events.push((Event::Deselecting, id.to_string(), kind));
    }
    fn selected(&mut self, id: &str, kind: EntityKind) {
        self.events.push((Event::Selected, id.to_string(), kind));
    }
    fn deselected(&mut self, id: &str, kind: EntityKind) {
        self.events.push((Event::Deselected, id.to_string(), kind));
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Two rows, item "a" drawn at (50,50)-(150,150) and item "b" at (300,50)-(400,90).
fn chart() -> ChartState {
    let mut state = ChartState::new();
    state.insert_row(Row::new("r1", 0.0, 40.0));
    state.insert_row(Row::new("r2", 40.0, 40.0));
    state.show_all_rows();
    state.insert_item(Item::new("a", "r1", 50, 150));
    state.insert_item(Item::new("b", "r2", 300, 400));
    state.elements.register(EntityKind::Item, "a", Rect::new(50.0, 50.0, 150.0, 150.0));
    state.elements.register(EntityKind::Item, "b", Rect::new(300.0, 50.0, 400.0, 90.0));
    state
}

/// Run one full drag from `from` to `to` and release.
fn drag(sel: &mut RectangleSelection, state: &mut ChartState, hooks: &mut Recorder, from: Point, to: Point) {
    assert!(sel.on_pointer_down(state, from, Button::Primary));
    sel.on_pointer_move(to);
    sel.on_frame(state, hooks);
    sel.on_pointer_up(state, hooks);
}

// =============================================================
// Selecting
// =============================================================

#[test]
fn rectangle_over_item_selects_it() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    assert!(sel.on_pointer_down(&mut state, pt(10.0, 10.0), Button::Primary));
    assert!(sel.on_pointer_move(pt(100.0, 100.0)));
    assert!(sel.on_frame(&mut state, &mut hooks));

    assert_eq!(state.selection.selecting.items, vec!["a".to_string()]);
    assert!(state.item("a").unwrap().selecting);
    assert!(!state.item("b").unwrap().selecting);
    assert!(hooks.has(Event::Selecting, "a"));

    sel.on_pointer_up(&mut state, &mut hooks);
    assert_eq!(state.selection.selected.items, vec!["a".to_string()]);
    assert!(state.selection.selecting.is_empty());
    let a = state.item("a").unwrap();
    assert!(a.selected);
    assert!(!a.selecting);
    assert!(!sel.is_selecting());
}

#[test]
fn shrinking_rectangle_fires_deselecting() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(10.0, 10.0), Button::Primary);
    sel.on_pointer_move(pt(350.0, 100.0));
    sel.on_frame(&mut state, &mut hooks);
    assert_eq!(state.selection.selecting.items.len(), 2);

    sel.on_pointer_move(pt(100.0, 100.0));
    sel.on_frame(&mut state, &mut hooks);
    assert_eq!(state.selection.selecting.items, vec!["a".to_string()]);
    assert!(hooks.has(Event::Deselecting, "b"));
    assert!(!state.item("b").unwrap().selecting);
}

#[test]
fn repeated_frame_is_idempotent() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(10.0, 10.0), Button::Primary);
    sel.on_pointer_move(pt(100.0, 100.0));
    sel.on_frame(&mut state, &mut hooks);
    let after_first = state.selection.clone();

    sel.on_pointer_move(pt(100.0, 100.0));
    sel.on_frame(&mut state, &mut hooks);
    assert_eq!(state.selection, after_first);
    assert_eq!(hooks.count(Event::Selecting), 1);
    assert_eq!(hooks.count(Event::Deselecting), 0);
}

#[test]
fn rectangle_missing_everything_selects_nothing() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(500.0, 500.0), pt(600.0, 600.0));
    assert!(state.selection.selected.is_empty());
    assert!(hooks.events.is_empty());
}

#[test]
fn reverse_drag_normalizes_corners() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(100.0, 100.0), Button::Primary);
    sel.on_pointer_move(pt(10.0, 10.0));
    sel.on_frame(&mut state, &mut hooks);
    assert_eq!(sel.visible_rect(), Some(Rect::new(10.0, 10.0, 100.0, 100.0)));
    assert_eq!(state.selection.selecting.items, vec!["a".to_string()]);
}

#[test]
fn pointer_is_mapped_through_viewport_origin() {
    let mut state = chart();
    state.viewport = Viewport { origin: pt(1000.0, 500.0), ..Viewport::default() };
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(1010.0, 510.0), Button::Primary);
    assert_eq!(sel.rect().start_x, 10.0);
    assert_eq!(sel.rect().start_y, 10.0);
    sel.on_pointer_move(pt(1100.0, 600.0));
    sel.on_frame(&mut state, &mut hooks);
    assert_eq!(state.selection.selecting.items, vec!["a".to_string()]);
}

// =============================================================
// Pointer-down / pointer-up
// =============================================================

#[test]
fn non_primary_button_is_ignored() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    assert!(!sel.on_pointer_down(&mut state, pt(10.0, 10.0), Button::Secondary));
    assert!(!sel.is_selecting());
    assert!(!sel.on_pointer_move(pt(100.0, 100.0)));
}

#[test]
fn pointer_down_clears_previous_selection() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(100.0, 100.0));
    assert!(state.item("a").unwrap().selected);

    sel.on_pointer_down(&mut state, pt(700.0, 700.0), Button::Primary);
    assert!(state.selection.selected.is_empty());
    assert!(!state.item("a").unwrap().selected);
    assert!(sel.is_selecting());
    assert!(sel.visible_rect().is_none());
}

#[test]
fn release_without_drag_clears_selection() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(100.0, 100.0));
    assert!(!state.selection.selected.is_empty());

    sel.on_pointer_up(&mut state, &mut hooks);
    assert!(state.selection.selected.is_empty());
    assert!(!state.item("a").unwrap().selected);
}

#[test]
fn click_without_move_commits_empty_selection() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();
    sel.on_pointer_down(&mut state, pt(60.0, 60.0), Button::Primary);
    sel.on_pointer_up(&mut state, &mut hooks);
    assert!(state.selection.selected.is_empty());
    assert!(!sel.is_selecting());
}

#[test]
fn commit_fires_deselecting_for_promoted_elements() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(100.0, 100.0));
    assert!(hooks.has(Event::Deselecting, "a"));
}

#[test]
fn unrendered_items_are_never_hit() {
    let mut state = chart();
    state.elements.unregister(EntityKind::Item, "a");
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(100.0, 100.0));
    assert!(state.selection.selected.items.is_empty());
}

// =============================================================
// Coalescing
// =============================================================

#[test]
fn moves_coalesce_to_latest_per_frame() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(10.0, 10.0), Button::Primary);
    assert!(sel.on_pointer_move(pt(350.0, 100.0)));
    assert!(!sel.on_pointer_move(pt(100.0, 100.0)));
    assert!(sel.on_frame(&mut state, &mut hooks));
    assert!(!sel.on_frame(&mut state, &mut hooks));
    assert_eq!(state.selection.selecting.items, vec!["a".to_string()]);
    assert!(!hooks.has(Event::Selecting, "b"));
}

#[test]
fn pending_move_dropped_on_release() {
    let mut state = chart();
    let mut sel = RectangleSelection::new(SelectionConfig::default());
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(10.0, 10.0), Button::Primary);
    sel.on_pointer_move(pt(100.0, 100.0));
    sel.on_pointer_up(&mut state, &mut hooks);
    assert!(!sel.on_frame(&mut state, &mut hooks));
    assert!(state.selection.selected.is_empty());
}

// =============================================================
// Config
// =============================================================

#[test]
fn disabled_vertical_axis_pins_rectangle_height() {
    let mut state = chart();
    let config = SelectionConfig { vertical: false, ..SelectionConfig::default() };
    let mut sel = RectangleSelection::new(config);
    let mut hooks = Recorder::default();

    sel.on_pointer_down(&mut state, pt(10.0, 60.0), Button::Primary);
    sel.on_pointer_move(pt(100.0, 300.0));
    sel.on_frame(&mut state, &mut hooks);
    let rect = sel.rect();
    assert_eq!(rect.from_y, 60.0);
    assert_eq!(rect.to_y, 60.0);
    assert_eq!(rect.to_x, 100.0);
    assert_eq!(state.selection.selecting.items, vec!["a".to_string()]);
}

#[test]
fn disabled_items_are_not_selected() {
    let mut state = chart();
    state.elements.register(EntityKind::ItemsRow, "r1", Rect::new(0.0, 0.0, 1000.0, 40.0));
    let config = SelectionConfig { items: false, rows: true, ..SelectionConfig::default() };
    let mut sel = RectangleSelection::new(config);
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(100.0, 100.0));
    assert!(state.selection.selected.items.is_empty());
    assert_eq!(state.selection.selected.items_rows, vec!["r1".to_string()]);
}

// =============================================================
// Grid blocks
// =============================================================

fn grid_chart() -> ChartState {
    let mut state = chart();
    state.regenerate_grid(&[PeriodDate { left_global: 0, right_global: 86_399_999 }]);
    state.elements.register(EntityKind::GridRow, "r1", Rect::new(0.0, 0.0, 100.0, 40.0));
    state.elements.register(EntityKind::GridRowBlock, "r1:1970-01-01", Rect::new(0.0, 0.0, 100.0, 40.0));
    state
}

#[test]
fn block_selection_fires_selected_then_deselected() {
    let mut state = grid_chart();
    let config = SelectionConfig { grid: true, ..SelectionConfig::default() };
    let mut sel = RectangleSelection::new(config);
    let mut hooks = Recorder::default();

    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(20.0, 20.0));
    assert!(hooks.has(Event::Selected, "r1:1970-01-01"));
    assert!(state.grid[0].blocks[0].selected);
    assert!(state.grid[0].selected);
    assert!(state.selection.is_block_selected("r1:1970-01-01"));

    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(500.0, 500.0), pt(510.0, 510.0));
    assert!(hooks.has(Event::Deselected, "r1:1970-01-01"));
    assert!(!state.grid[0].blocks[0].selected);
}

#[test]
fn reselecting_same_block_fires_no_selected() {
    let mut state = grid_chart();
    let config = SelectionConfig { grid: true, ..SelectionConfig::default() };
    let mut sel = RectangleSelection::new(config);
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(20.0, 20.0));

    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(30.0, 10.0), pt(40.0, 20.0));
    assert_eq!(hooks.count(Event::Selected), 0);
    assert_eq!(hooks.count(Event::Deselected), 0);
    assert!(state.grid[0].blocks[0].selected);
}

#[test]
fn selected_block_survives_regeneration() {
    let mut state = grid_chart();
    let config = SelectionConfig { grid: true, ..SelectionConfig::default() };
    let mut sel = RectangleSelection::new(config);
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(20.0, 20.0));

    state.regenerate_grid(&[
        PeriodDate { left_global: 0, right_global: 86_399_999 },
        PeriodDate { left_global: 86_400_000, right_global: 172_799_999 },
    ]);
    assert!(state.grid[0].blocks[0].selected);
    assert!(!state.grid[0].blocks[1].selected);
}

#[test]
fn clear_selection_resets_every_flag() {
    let mut state = grid_chart();
    let config = SelectionConfig { grid: true, ..SelectionConfig::default() };
    let mut sel = RectangleSelection::new(config);
    let mut hooks = Recorder::default();
    drag(&mut sel, &mut state, &mut hooks, pt(10.0, 10.0), pt(100.0, 100.0));

    clear_selection(&mut state);
    assert!(state.selection.selected.is_empty());
    assert!(state.items().all(|i| !i.selected && !i.selecting));
    assert!(state.grid.iter().all(|r| !r.selected && r.blocks.iter().all(|b| !b.selected)));
}

#[test]
fn entity_sets_serialize_with_chart_keys() {
    let mut sets = EntitySets::default();
    sets.set(EntityKind::Item, vec!["a".into()]);
    let json = serde_json::to_value(&sets).unwrap();
    assert_eq!(json[EntityKind::Item.key()], serde_json::json!(["a"]));
    assert_eq!(json[EntityKind::GridRowBlock.key()], serde_json::json!([]));
}
