use revive_core::compare::ComparisonMode;
use revive_core::filter::FilterPreset;

use crate::app::ReviveApp;
use crate::panels::enum_combo;

pub fn show(ctx: &egui::Context, app: &mut ReviveApp) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            if app.viewer.is_editing() {
                edit_controls(ui, app);
            } else {
                view_controls(ui, app);
            }
        });
    });
}

fn view_controls(ui: &mut egui::Ui, app: &mut ReviveApp) {
    let has_image = app.viewer.has_image();

    let can_edit = has_image && !app.viewer.is_video();
    if ui.add_enabled(can_edit, egui::Button::new("Edit")).clicked() {
        app.enter_edit();
    }
    ui.separator();

    let comparable = has_image && !app.viewer.is_comparison_disabled();
    let current = app.viewer.comparison_mode();
    for mode in [ComparisonMode::Slider, ComparisonMode::Side] {
        let button = egui::Button::selectable(current == mode, mode.to_string());
        if ui.add_enabled(comparable, button).clicked() {
            let next = if current == mode {
                ComparisonMode::Single
            } else {
                mode
            };
            app.viewer.set_comparison_mode(next);
        }
    }
    ui.separator();

    ui.add_enabled_ui(has_image, |ui| {
        if ui.button("Fit").clicked() {
            app.viewer.fit_all();
        }
        if ui.button("Fit H").clicked() {
            app.viewer.fit_to_height();
        }
        if ui.button("100%").clicked() {
            app.viewer.reset_zoom();
        }
    });
    ui.separator();

    let mut filter = app.ui_state.filter;
    if enum_combo(ui, "Filter", &mut filter, FilterPreset::ALL) {
        app.ui_state.filter = filter;
    }

    if app.viewer.comparison_mode() == ComparisonMode::Slider && comparable {
        ui.separator();
        let mut position = app.viewer.slider_position();
        let slider = egui::Slider::new(&mut position, 0.0..=1.0)
            .show_value(false)
            .text("Divider");
        if ui.add(slider).changed() {
            app.viewer.set_slider_position(position);
        }
    }
}

fn edit_controls(ui: &mut egui::Ui, app: &mut ReviveApp) {
    let step = app.viewer.config().edit.straighten_step_deg;
    let applying = app.ui_state.applying;

    ui.add_enabled_ui(!applying, |ui| {
        let Some(session) = app.viewer.session_mut() else {
            return;
        };

        if ui.button("Rotate L").on_hover_text("Rotate left").clicked() {
            session.rotate_left_90();
        }
        if ui.button("Rotate R").on_hover_text("Rotate right").clicked() {
            session.rotate_right_90();
        }
        let flipped = session.params().is_flipped();
        if ui
            .add(egui::Button::selectable(flipped, "Flip"))
            .on_hover_text("Mirror horizontally")
            .clicked()
        {
            session.flip_horizontal();
        }
        ui.separator();

        let limit = session.straighten_limit();
        let mut straighten = session.params().straighten_deg();
        let slider = egui::Slider::new(&mut straighten, -limit..=limit)
            .step_by(step)
            .suffix("°")
            .text("Straighten");
        if ui.add(slider).changed() {
            session.set_straighten(straighten);
        }
        ui.separator();

        let crop_mode = session.is_crop_mode();
        if ui
            .add(egui::Button::selectable(crop_mode, "Crop"))
            .on_hover_text("Drag on the image to draw a crop box")
            .clicked()
        {
            session.toggle_crop_mode();
        }
        ui.separator();

        if ui.button("-").on_hover_text("Zoom out").clicked() {
            app.viewer.zoom_out();
        }
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            app.viewer.zoom_in();
        }
        ui.separator();

        if ui.button("Reset").clicked() {
            if let Some(session) = app.viewer.session_mut() {
                session.reset();
            }
        }
    });

    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        if ui.button("Cancel").clicked() {
            app.cancel_edits();
        }
        let apply_label = if applying { "Applying..." } else { "Apply" };
        if ui
            .add_enabled(!applying, egui::Button::new(apply_label))
            .clicked()
        {
            app.apply_edits();
        }
        if applying {
            ui.spinner();
        }
    });
}
