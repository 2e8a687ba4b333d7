use super::*;

const DAY: i64 = 86_400_000;

// =============================================================
// SnapFn
// =============================================================

#[test]
fn identity_adds_delta() {
    let f = SnapFn::identity();
    assert_eq!(f.apply(1_000, 500), 1_500);
    assert_eq!(f.apply(1_000, -250), 750);
}

#[test]
fn default_is_identity() {
    assert_eq!(SnapFn::default().apply(42, 8), 50);
}

#[test]
fn custom_closure_is_called() {
    let f = SnapFn::new(|time, _delta| time);
    assert_eq!(f.apply(7, 1_000), 7);
}

#[test]
fn to_grid_rounds_to_nearest_step() {
    let f = SnapFn::to_grid(DAY);
    assert_eq!(f.apply(0, DAY / 2 - 1), 0);
    assert_eq!(f.apply(0, DAY / 2), DAY);
    assert_eq!(f.apply(DAY, DAY + 10), 2 * DAY);
}

#[test]
fn to_grid_handles_negative_times() {
    let f = SnapFn::to_grid(100);
    assert_eq!(f.apply(-120, 0), -100);
    assert_eq!(f.apply(-160, 0), -200);
}

#[test]
fn to_grid_non_positive_step_is_identity() {
    assert_eq!(SnapFn::to_grid(0).apply(13, 4), 17);
    assert_eq!(SnapFn::to_grid(-5).apply(13, 4), 17);
}

#[test]
fn snap_fn_debug_is_opaque() {
    assert_eq!(format!("{:?}", SnapFn::identity()), "SnapFn(..)");
}

// =============================================================
// SnapOverride
// =============================================================

#[test]
fn override_default_is_empty() {
    assert!(SnapOverride::default().is_empty());
    let o = SnapOverride { start: Some(SnapFn::identity()), end: None };
    assert!(!o.is_empty());
}

// =============================================================
// SnapPolicy::resolve
// =============================================================

fn constant(value: i64) -> SnapFn {
    SnapFn::new(move |_, _| value)
}

#[test]
fn resolve_without_overrides_keeps_global() {
    let global = SnapPolicy::new(constant(1), constant(2));
    let p = global.resolve(None, None);
    assert_eq!(p.snap_start(0, 0), 1);
    assert_eq!(p.snap_end(0, 0), 2);
}

#[test]
fn resolve_row_override_beats_global() {
    let global = SnapPolicy::new(constant(1), constant(2));
    let row = SnapOverride { start: Some(constant(10)), end: None };
    let p = global.resolve(Some(&row), None);
    assert_eq!(p.snap_start(0, 0), 10);
    assert_eq!(p.snap_end(0, 0), 2);
}

#[test]
fn resolve_item_override_beats_row() {
    let global = SnapPolicy::new(constant(1), constant(2));
    let row = SnapOverride { start: Some(constant(10)), end: Some(constant(20)) };
    let item = SnapOverride { start: None, end: Some(constant(200)) };
    let p = global.resolve(Some(&row), Some(&item));
    assert_eq!(p.snap_start(0, 0), 10);
    assert_eq!(p.snap_end(0, 0), 200);
}
