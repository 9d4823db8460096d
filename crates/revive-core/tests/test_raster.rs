#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;

use revive_core::config::ExportConfig;
use revive_core::edit::{EditParameters, Rotation};
use revive_core::error::ReviveError;
use revive_core::geometry::{ClientRect, Container, Dimensions, Size, Vec2};
use revive_core::raster::{self, RasterRequest};
use revive_core::view::ViewState;

use common::{coordinate_image, dynamic, png_payload, split_image, viewer_with};

fn request(params: EditParameters, zoom: f64, container: Container) -> RasterRequest {
    RasterRequest {
        params,
        view: ViewState::centered(zoom),
        container,
        export: ExportConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[test]
fn test_plan_identity_covers_whole_image() {
    let req = request(EditParameters::identity(), 1.0, Container::sized(800.0, 600.0));
    let plan = raster::plan(Dimensions::new(800, 600), &req).unwrap();
    assert_eq!(plan.surface, Dimensions::new(800, 600));
    assert_eq!(plan.output, Dimensions::new(800, 600));
    assert_relative_eq!(plan.crop.x, 0.0);
    assert_relative_eq!(plan.crop.y, 0.0);
}

#[test]
fn test_plan_rotate_right_swaps_output() {
    let params = EditParameters::new(Rotation::Deg90, false, 0.0);
    let req = request(params, 1.0, Container::sized(600.0, 800.0));
    let plan = raster::plan(Dimensions::new(800, 600), &req).unwrap();
    assert_eq!(plan.surface, Dimensions::new(600, 800));
    assert_eq!(plan.output, Dimensions::new(600, 800));
}

#[test]
fn test_plan_crop_left_half() {
    let crop = ClientRect::anchored(Vec2::new(0.0, 0.0)).with_end(Vec2::new(400.0, 600.0));
    let params = EditParameters::identity().with_crop_box(Some(crop));
    let req = request(params, 1.0, Container::sized(800.0, 600.0));
    let plan = raster::plan(Dimensions::new(800, 600), &req).unwrap();
    assert_eq!(plan.output, Dimensions::new(400, 600));
    assert_relative_eq!(plan.crop.x, 0.0);
}

#[test]
fn test_plan_crop_uses_container_origin_and_zoom() {
    // 800x600 at zoom 0.5 in a 400x300 container placed at (100, 50):
    // the image fills the container exactly.
    let crop = ClientRect::anchored(Vec2::new(300.0, 50.0)).with_end(Vec2::new(500.0, 200.0));
    let params = EditParameters::identity().with_crop_box(Some(crop));
    let container = Container::new(Vec2::new(100.0, 50.0), Size::new(400.0, 300.0));
    let req = request(params, 0.5, container);
    let plan = raster::plan(Dimensions::new(800, 600), &req).unwrap();
    assert_relative_eq!(plan.crop.x, 400.0, epsilon = 1e-9);
    assert_relative_eq!(plan.crop.y, 0.0, epsilon = 1e-9);
    assert_eq!(plan.output, Dimensions::new(400, 300));
}

#[test]
fn test_plan_without_crop_uses_visible_viewport() {
    // Zoomed to 2x: only the central quarter of the image is visible.
    let req = request(EditParameters::identity(), 2.0, Container::sized(400.0, 300.0));
    let plan = raster::plan(Dimensions::new(400, 300), &req).unwrap();
    assert_eq!(plan.output, Dimensions::new(200, 150));
    assert_relative_eq!(plan.crop.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(plan.crop.y, 75.0, epsilon = 1e-9);
}

#[test]
fn test_plan_degenerate_crop_is_one_pixel() {
    let crop = ClientRect::anchored(Vec2::new(10.0, 10.0));
    let params = EditParameters::identity().with_crop_box(Some(crop));
    let req = request(params, 1.0, Container::sized(100.0, 100.0));
    let plan = raster::plan(Dimensions::new(100, 100), &req).unwrap();
    assert_eq!(plan.output, Dimensions::new(1, 1));
}

#[test]
fn test_plan_oversized_surface_is_unavailable() {
    let req = request(EditParameters::identity(), 1.0, Container::sized(100.0, 100.0));
    let err = raster::plan(Dimensions::new(40_000, 10), &req).unwrap_err();
    assert!(matches!(err, ReviveError::SurfaceUnavailable { .. }));
    assert!(err.is_silent());
}

#[test]
fn test_plan_oversized_output_is_unavailable() {
    // Zoomed far out, the visible viewport covers more source pixels than a surface allows.
    let req = request(EditParameters::identity(), 0.1, Container::sized(4000.0, 4000.0));
    let err = raster::plan(Dimensions::new(100, 100), &req).unwrap_err();
    assert!(matches!(err, ReviveError::SurfaceUnavailable { width: 40_000, .. }));
}

// ---------------------------------------------------------------------------
// Pixels
// ---------------------------------------------------------------------------

#[test]
fn test_identity_round_trip_preserves_pixels() {
    let source = coordinate_image(64, 48);
    let req = request(EditParameters::identity(), 1.0, Container::sized(64.0, 48.0));
    let out = raster::render(&dynamic(source.clone()), &req).unwrap();
    assert_eq!(out.dimensions(), (64, 48));
    assert_eq!(out, source);
}

#[test]
fn test_flip_mirrors_columns() {
    let source = coordinate_image(10, 4);
    let params = EditParameters::new(Rotation::Deg0, true, 0.0);
    let req = request(params, 1.0, Container::sized(10.0, 4.0));
    let out = raster::render(&dynamic(source.clone()), &req).unwrap();
    for y in 0..4 {
        for x in 0..10 {
            assert_eq!(out.get_pixel(x, y), source.get_pixel(9 - x, y));
        }
    }
}

#[test]
fn test_rotate_right_moves_top_left_to_top_right() {
    let source = coordinate_image(8, 6);
    let params = EditParameters::new(Rotation::Deg90, false, 0.0);
    let req = request(params, 1.0, Container::sized(6.0, 8.0));
    let out = raster::render(&dynamic(source.clone()), &req).unwrap();
    assert_eq!(out.dimensions(), (6, 8));
    // Clockwise: source (x, y) lands at (h - 1 - y, x).
    for y in 0..6 {
        for x in 0..8 {
            assert_eq!(out.get_pixel(5 - y, x), source.get_pixel(x, y));
        }
    }
}

#[test]
fn test_crop_left_half_keeps_left_colour() {
    let source = split_image(80, 60);
    let crop = ClientRect::anchored(Vec2::new(0.0, 0.0)).with_end(Vec2::new(40.0, 60.0));
    let params = EditParameters::identity().with_crop_box(Some(crop));
    let req = request(params, 1.0, Container::sized(80.0, 60.0));
    let out = raster::render(&dynamic(source), &req).unwrap();
    assert_eq!(out.dimensions(), (40, 60));
    assert!(out.pixels().all(|p| p.0 == [255, 0, 0, 255]));
}

#[test]
fn test_area_outside_image_is_transparent() {
    let source = split_image(10, 10);
    // Zoom 0.5 in a 10x10 container: the image covers only the central 5x5.
    let req = request(EditParameters::identity(), 0.5, Container::sized(10.0, 10.0));
    let out = raster::render(&dynamic(source), &req).unwrap();
    assert_eq!(out.dimensions(), (20, 20));
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    assert_eq!(out.get_pixel(19, 19).0[3], 0);
    assert_eq!(out.get_pixel(7, 10).0, [255, 0, 0, 255]);
}

#[test]
fn test_straighten_leaves_transparent_corners() {
    let source = split_image(40, 40);
    let params = EditParameters::new(Rotation::Deg0, false, 15.0);
    let bounds = params.rotated_bounds(Dimensions::new(40, 40));
    let container = Container::sized(bounds.width as f64, bounds.height as f64);
    let out = raster::render(&dynamic(source), &request(params, 1.0, container)).unwrap();
    assert_eq!(out.dimensions(), (bounds.width, bounds.height));
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    let center = out.get_pixel(bounds.width / 2, bounds.height / 2).0;
    assert_eq!(center[3], 255);
}

// ---------------------------------------------------------------------------
// Encoding and the viewer apply path
// ---------------------------------------------------------------------------

#[test]
fn test_rasterize_keeps_mime_type() {
    let source = coordinate_image(16, 16);
    let req = request(EditParameters::identity(), 1.0, Container::sized(16.0, 16.0));
    let payload = raster::rasterize(&dynamic(source.clone()), &req, "image/png").unwrap();
    assert_eq!(payload.mime_type, "image/png");
    let decoded = payload.decode().unwrap().to_rgba8();
    assert_eq!(decoded, source);
}

#[test]
fn test_rasterize_jpeg_has_full_size() {
    let source = coordinate_image(32, 20);
    let req = request(EditParameters::identity(), 1.0, Container::sized(32.0, 20.0));
    let payload = raster::rasterize(&dynamic(source), &req, "image/jpeg").unwrap();
    assert_eq!(payload.mime_type, "image/jpeg");
    assert_eq!(payload.probe_dimensions().unwrap(), Dimensions::new(32, 20));
}

#[test]
fn test_rasterize_unknown_mime_falls_back_to_png() {
    let source = coordinate_image(4, 4);
    let req = request(EditParameters::identity(), 1.0, Container::sized(4.0, 4.0));
    let payload = raster::rasterize(&dynamic(source), &req, "image/x-unknown").unwrap();
    assert_eq!(payload.mime_type, "image/png");
}

#[test]
fn test_request_for_image_uses_rotated_bounds() {
    let params = EditParameters::new(Rotation::Deg270, false, 0.0);
    let req = RasterRequest::for_image(Dimensions::new(30, 20), params, ExportConfig::default());
    assert_eq!(req.container.size, Size::new(20.0, 30.0));
    let plan = raster::plan(Dimensions::new(30, 20), &req).unwrap();
    assert_eq!(plan.output, Dimensions::new(20, 30));
}

#[test]
fn test_viewer_apply_rotate_right_full_viewport() {
    let source = png_payload(&coordinate_image(800, 600));
    let mut viewer = viewer_with((600.0, 800.0), None, Some((800, 600)));
    viewer.enter_edit().unwrap();
    viewer.session_mut().unwrap().rotate_right_90();
    viewer.zoom_to(1.0);

    let out = viewer.apply_edits(&source).unwrap();
    assert_eq!(out.probe_dimensions().unwrap(), Dimensions::new(600, 800));
    assert!(!viewer.is_editing());
    // The session is gone; cancelling afterwards is a no-op.
    assert!(!viewer.cancel_edits());
}

#[test]
fn test_viewer_apply_failure_keeps_session() {
    let broken = revive_core::payload::ImagePayload::new("image/png", vec![0, 1, 2, 3]);
    let mut viewer = viewer_with((400.0, 300.0), None, Some((800, 600)));
    viewer.enter_edit().unwrap();
    viewer.session_mut().unwrap().flip_horizontal();
    let err = viewer.apply_edits(&broken).unwrap_err();
    assert_eq!(err.user_message(), "Failed to load image for editing.");
    assert!(viewer.is_editing());
    assert!(viewer.session().unwrap().params().is_flipped());
}

#[test]
fn test_apply_request_requires_edit_mode() {
    let viewer = viewer_with((400.0, 300.0), None, Some((800, 600)));
    assert!(matches!(viewer.apply_request(), Err(ReviveError::NotEditing)));
}
