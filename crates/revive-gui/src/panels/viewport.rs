use revive_core::compare::{Layout, RenderPlan, Surface};
use revive_core::edit::EscapeOutcome;
use revive_core::geometry::{Container, PanGuides, Size, Vec2};
use revive_core::raster;

use crate::app::ReviveApp;

const DIVIDER_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 255, 255);
const CROP_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 200, 0);
const GUIDE_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(160, 160, 160, 160);

pub fn show(ctx: &egui::Context, app: &mut ReviveApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        app.viewer.set_container(Container::new(
            Vec2::new(rect.min.x as f64, rect.min.y as f64),
            Size::new(rect.width() as f64, rect.height() as f64),
        ));

        if !app.viewer.has_image() || app.viewport.after.is_none() {
            show_placeholder(ui, app.viewport.loading);
            return;
        }

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        handle_wheel(ui, &response, app);
        handle_drag(ui, &response, app);
        handle_escape(ctx, app);

        if response.double_clicked() && !app.viewer.is_editing() {
            app.viewer.fit_all();
        }

        let filter = app.ui_state.filter;
        app.viewport.prepare_filter(ctx, filter);
        let plan = app.viewer.render_plan(filter);

        let painter = ui.painter_at(rect);
        draw_plan(&painter, rect, &plan, app);
        draw_crop_overlay(&painter, rect, app);
        draw_pan_guides(&painter, rect, app.viewer.pan_guides());
        draw_viewing_label(&painter, rect, &app.viewport.viewing_label);

        if app.viewer.is_panning() {
            ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if app.viewer.session().is_some_and(|s| s.is_crop_mode()) {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn to_pos(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x as f32, v.y as f32)
}

fn handle_wheel(ui: &egui::Ui, response: &egui::Response, app: &mut ReviveApp) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }
    // egui reports wheel-up as positive; the viewer expects DOM-style deltas.
    app.viewer.wheel(-scroll_delta as f64);
}

fn handle_drag(ui: &egui::Ui, response: &egui::Response, app: &mut ReviveApp) {
    if app.ui_state.applying {
        return;
    }
    if response.drag_started_by(egui::PointerButton::Primary) {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            app.viewer
                .pointer_down(Vec2::new(origin.x as f64, origin.y as f64));
        }
    }
    if response.dragged_by(egui::PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            app.viewer.pointer_move(Vec2::new(pos.x as f64, pos.y as f64));
        }
    }
    if response.drag_stopped() {
        app.viewer.pointer_up();
    }
}

fn handle_escape(ctx: &egui::Context, app: &mut ReviveApp) {
    if !app.viewer.is_editing() || !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        return;
    }
    if app.viewer.handle_escape() == EscapeOutcome::SessionCancelled {
        app.cancel_edits();
        app.ui_state.add_log("Edits cancelled".into());
    }
}

fn draw_plan(painter: &egui::Painter, rect: egui::Rect, plan: &RenderPlan, app: &ReviveApp) {
    for surface in plan.surfaces() {
        draw_surface(painter, rect, surface, app);
    }

    match plan.layout {
        Layout::Slider { divider_x, .. } => {
            let x = rect.min.x + divider_x as f32;
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                egui::Stroke::new(2.0, DIVIDER_COLOR),
            );
            painter.circle_filled(egui::pos2(x, rect.center().y), 8.0, DIVIDER_COLOR);
        }
        Layout::Single { video: true, .. } => {
            painter.text(
                rect.center_bottom() - egui::vec2(0.0, 24.0),
                egui::Align2::CENTER_BOTTOM,
                "Video preview",
                egui::FontId::proportional(14.0),
                egui::Color32::from_white_alpha(200),
            );
        }
        _ => {}
    }
}

/// Paint one surface as a textured quad through its affine corners.
fn draw_surface(painter: &egui::Painter, rect: egui::Rect, surface: &Surface, app: &ReviveApp) {
    let Some(image) = app.viewport.image(surface.role) else {
        return;
    };
    let texture = image.texture(surface.filter);

    let offset = rect.min.to_vec2();
    let uvs = [
        egui::pos2(0.0, 0.0),
        egui::pos2(1.0, 0.0),
        egui::pos2(1.0, 1.0),
        egui::pos2(0.0, 1.0),
    ];
    let mut mesh = egui::Mesh::with_texture(texture.id());
    for (corner, uv) in surface.corners.iter().zip(uvs) {
        mesh.vertices.push(egui::epaint::Vertex {
            pos: to_pos(*corner) + offset,
            uv,
            color: egui::Color32::WHITE,
        });
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);

    let clip = egui::Rect::from_min_size(
        egui::pos2(surface.clip.x as f32, surface.clip.y as f32) + offset,
        egui::vec2(surface.clip.width as f32, surface.clip.height as f32),
    )
    .intersect(rect);
    painter.with_clip_rect(clip).add(egui::Shape::mesh(mesh));
}

fn draw_crop_overlay(painter: &egui::Painter, rect: egui::Rect, app: &ReviveApp) {
    let Some(session) = app.viewer.session() else {
        return;
    };
    let Some(crop) = session.effective_crop() else {
        return;
    };
    let r = crop.normalized();
    let crop_rect = egui::Rect::from_min_size(
        egui::pos2(r.x as f32, r.y as f32),
        egui::vec2(r.width as f32, r.height as f32),
    );

    // Dim everything outside the box.
    let shade = egui::Color32::from_black_alpha(140);
    let outside = [
        egui::Rect::from_min_max(rect.min, egui::pos2(rect.max.x, crop_rect.min.y)),
        egui::Rect::from_min_max(egui::pos2(rect.min.x, crop_rect.max.y), rect.max),
        egui::Rect::from_min_max(
            egui::pos2(rect.min.x, crop_rect.min.y),
            egui::pos2(crop_rect.min.x, crop_rect.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(crop_rect.max.x, crop_rect.min.y),
            egui::pos2(rect.max.x, crop_rect.max.y),
        ),
    ];
    for band in outside {
        if band.is_positive() {
            painter.rect_filled(band.intersect(rect), 0.0, shade);
        }
    }
    painter.rect_stroke(
        crop_rect,
        0.0,
        egui::Stroke::new(1.5, CROP_COLOR),
        egui::StrokeKind::Outside,
    );

    let source = app
        .viewer
        .after_dimensions()
        .or(app.viewer.before_dimensions());
    let output = source.zip(app.viewer.apply_request().ok()).and_then(|(dims, request)| {
        raster::plan(dims, &request).ok().map(|plan| plan.output)
    });
    if let Some(output) = output {
        painter.text(
            crop_rect.left_top() - egui::vec2(0.0, 4.0),
            egui::Align2::LEFT_BOTTOM,
            output.to_string(),
            egui::FontId::monospace(12.0),
            CROP_COLOR,
        );
    }
}

fn draw_pan_guides(painter: &egui::Painter, rect: egui::Rect, guides: PanGuides) {
    if !guides.any() {
        return;
    }
    let c = rect.center();
    let inset = 16.0;
    let arrows = [
        (guides.up, egui::pos2(c.x, rect.top() + inset), egui::vec2(0.0, -1.0)),
        (guides.down, egui::pos2(c.x, rect.bottom() - inset), egui::vec2(0.0, 1.0)),
        (guides.left, egui::pos2(rect.left() + inset, c.y), egui::vec2(-1.0, 0.0)),
        (guides.right, egui::pos2(rect.right() - inset, c.y), egui::vec2(1.0, 0.0)),
    ];
    for (shown, tip, dir) in arrows {
        if !shown {
            continue;
        }
        let side = egui::vec2(-dir.y, dir.x) * 7.0;
        let base = tip - dir * 10.0;
        painter.add(egui::Shape::convex_polygon(
            vec![tip, base + side, base - side],
            GUIDE_COLOR,
            egui::Stroke::NONE,
        ));
    }
}

fn draw_viewing_label(painter: &egui::Painter, rect: egui::Rect, label: &str) {
    if label.is_empty() {
        return;
    }
    let label_pos = rect.left_top() + egui::vec2(8.0, 8.0);
    painter.text(
        label_pos,
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}

fn show_placeholder(ui: &mut egui::Ui, loading: bool) {
    ui.centered_and_justified(|ui| {
        let text = if loading {
            "Loading..."
        } else {
            "Open an image to begin"
        };
        ui.label(
            egui::RichText::new(text)
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
