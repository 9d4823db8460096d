use approx::assert_relative_eq;

use revive_core::edit::{CropTool, EditParameters, EditSession, EscapeOutcome, Rotation};
use revive_core::geometry::{Dimensions, Vec2};
use revive_core::view::ViewState;

fn session() -> EditSession {
    EditSession::new(ViewState::centered(0.5), 15.0)
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

#[test]
fn test_rotation_from_degrees_normalizes() {
    assert_eq!(Rotation::from_degrees(0), Rotation::Deg0);
    assert_eq!(Rotation::from_degrees(450), Rotation::Deg90);
    assert_eq!(Rotation::from_degrees(-90), Rotation::Deg270);
    assert_eq!(Rotation::from_degrees(-180), Rotation::Deg180);
}

#[test]
fn test_rotation_display() {
    assert_eq!(format!("{}", Rotation::Deg270), "270°");
}

#[test]
fn test_rotate_right_four_times_is_identity() {
    let mut s = session();
    for _ in 0..4 {
        s.rotate_right_90();
    }
    assert!(s.params().is_identity());
}

#[test]
fn test_rotate_left_wraps() {
    let mut s = session();
    s.rotate_left_90();
    assert_eq!(s.params().rotation(), Rotation::Deg270);
    s.rotate_right_90();
    assert_eq!(s.params().rotation(), Rotation::Deg0);
}

#[test]
fn test_flip_twice_is_identity() {
    let mut s = session();
    s.flip_horizontal();
    assert_eq!(s.params().flip_scale_x(), -1.0);
    s.flip_horizontal();
    assert_eq!(s.params().flip_scale_x(), 1.0);
    assert!(s.params().is_identity());
}

// ---------------------------------------------------------------------------
// Straighten
// ---------------------------------------------------------------------------

#[test]
fn test_straighten_is_clamped() {
    let mut s = session();
    for deg in [-100.0, -15.5, -3.0, 0.0, 7.25, 15.0, 42.0] {
        s.set_straighten(deg);
        let value = s.params().straighten_deg();
        assert!((-15.0..=15.0).contains(&value), "{deg} -> {value}");
    }
    s.set_straighten(42.0);
    assert_eq!(s.params().straighten_deg(), 15.0);
    s.set_straighten(-3.0);
    assert_eq!(s.params().straighten_deg(), -3.0);
}

#[test]
fn test_straighten_ignores_non_finite() {
    let mut s = session();
    s.set_straighten(4.0);
    s.set_straighten(f64::NAN);
    s.set_straighten(f64::INFINITY);
    assert_eq!(s.params().straighten_deg(), 4.0);
}

// ---------------------------------------------------------------------------
// Transform and bounds
// ---------------------------------------------------------------------------

#[test]
fn test_edit_transform_flip_then_rotate() {
    let params = EditParameters::new(Rotation::Deg90, true, 0.0);
    // (1, 0) flips to (-1, 0), then turns clockwise to (0, -1).
    let p = params.edit_transform().apply(Vec2::new(1.0, 0.0));
    assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(p.y, -1.0, epsilon = 1e-12);
}

#[test]
fn test_edit_transform_quadrants_are_exact() {
    let params = EditParameters::new(Rotation::Deg180, false, 0.0);
    let t = params.edit_transform();
    assert_eq!(t.a, -1.0);
    assert_eq!(t.b, 0.0);
    assert_eq!(t.c, 0.0);
    assert_eq!(t.d, -1.0);
}

#[test]
fn test_rotated_bounds_quarter_turn_swaps_sides() {
    let params = EditParameters::new(Rotation::Deg90, false, 0.0);
    assert_eq!(params.rotated_bounds(Dimensions::new(800, 600)), Dimensions::new(600, 800));
}

#[test]
fn test_rotated_bounds_with_straighten() {
    let params = EditParameters::new(Rotation::Deg0, false, 10.0);
    let (w, h) = params.rotated_extent(Dimensions::new(100, 50));
    let (sin, cos) = 10f64.to_radians().sin_cos();
    assert_relative_eq!(w, 100.0 * cos + 50.0 * sin, epsilon = 1e-9);
    assert_relative_eq!(h, 100.0 * sin + 50.0 * cos, epsilon = 1e-9);
    let bounds = params.rotated_bounds(Dimensions::new(100, 50));
    assert_eq!(bounds, Dimensions::new(w.round() as u32, h.round() as u32));
}

#[test]
fn test_new_clamps_straighten() {
    let params = EditParameters::new(Rotation::Deg0, false, -40.0);
    assert_eq!(params.straighten_deg(), -15.0);
}

// ---------------------------------------------------------------------------
// Crop tool
// ---------------------------------------------------------------------------

#[test]
fn test_crop_drag_lifecycle() {
    let mut s = session();
    assert!(!s.begin_crop(Vec2::new(1.0, 1.0)));
    assert!(s.params().crop_box().is_none());

    s.toggle_crop_mode();
    assert_eq!(s.crop_tool(), CropTool::Armed);
    assert!(s.begin_crop(Vec2::new(5.0, 5.0)));
    s.update_crop(Vec2::new(25.0, 15.0));
    s.end_crop();
    assert_eq!(s.crop_tool(), CropTool::Armed);
    assert_eq!(s.effective_crop().unwrap().normalized().width, 20.0);

    // Further moves after release do not grow the box.
    s.update_crop(Vec2::new(100.0, 100.0));
    assert_eq!(s.effective_crop().unwrap().normalized().width, 20.0);
}

#[test]
fn test_toggle_crop_off_discards_box() {
    let mut s = session();
    s.toggle_crop_mode();
    s.begin_crop(Vec2::new(0.0, 0.0));
    s.update_crop(Vec2::new(10.0, 10.0));
    s.end_crop();
    s.toggle_crop_mode();
    assert_eq!(s.crop_tool(), CropTool::Off);
    assert!(s.params().crop_box().is_none());
    assert!(s.params_for_apply().crop_box().is_none());
}

#[test]
fn test_escape_order_in_session() {
    let mut s = session();
    s.toggle_crop_mode();
    s.begin_crop(Vec2::new(0.0, 0.0));
    assert_eq!(s.escape(), EscapeOutcome::CropDrawingCancelled);
    assert_eq!(s.escape(), EscapeOutcome::CropModeExited);
    assert_eq!(s.escape(), EscapeOutcome::SessionCancelled);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn test_reset_restores_initial_view_and_identity() {
    let mut s = session();
    s.rotate_right_90();
    s.flip_horizontal();
    s.set_straighten(5.0);
    s.toggle_crop_mode();
    s.view_mut().zoom = 3.0;
    s.view_mut().pan = Vec2::new(4.0, 4.0);

    s.reset();
    assert!(s.params().is_identity());
    assert_eq!(s.crop_tool(), CropTool::Off);
    assert_eq!(*s.view(), ViewState::centered(0.5));
}

#[test]
fn test_reset_is_idempotent() {
    let mut s = session();
    s.rotate_left_90();
    s.reset();
    let once = (s.params().clone(), *s.view(), s.crop_tool());
    s.reset();
    assert_eq!((s.params().clone(), *s.view(), s.crop_tool()), once);
}
