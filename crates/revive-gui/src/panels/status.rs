use crate::app::ReviveApp;

pub fn show(ctx: &egui::Context, app: &mut ReviveApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            let viewer = &app.viewer;
            match (viewer.before_dimensions(), viewer.after_dimensions()) {
                (Some(before), Some(after)) if !viewer.is_comparison_disabled() => {
                    ui.label(format!("Before {before}"));
                    ui.separator();
                    ui.label(format!("After {after}"));
                    ui.separator();
                }
                (_, Some(dims)) | (Some(dims), None) => {
                    ui.label(dims.to_string());
                    ui.separator();
                }
                (None, None) => {}
            }
            ui.label(format!("Zoom: {:.0}%", viewer.live_view().zoom * 100.0));
            ui.separator();
            let mode = if viewer.is_editing() {
                "Editing".to_string()
            } else {
                viewer.render_plan(app.ui_state.filter).mode.to_string()
            };
            ui.label(mode);
        });

        ui.add_space(2.0);
    });
}
