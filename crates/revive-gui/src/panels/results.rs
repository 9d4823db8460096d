use crate::app::ReviveApp;
use crate::panels::section_header;

const PANEL_WIDTH: f32 = 200.0;

pub fn show(ctx: &egui::Context, app: &mut ReviveApp) {
    egui::SidePanel::left("results_panel")
        .default_width(PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            let count = app.ui_state.results.len().to_string();
            section_header(ui, "Results", Some(&count));
            ui.separator();

            if app.ui_state.results.is_empty() {
                ui.weak("Open an image to begin");
                return;
            }

            let mut clicked = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, item) in app.ui_state.results.iter().enumerate().rev() {
                    let selected = app.ui_state.selected == Some(index);
                    let kind = if item.is_video() {
                        "video"
                    } else if item.is_edited() {
                        "edited"
                    } else {
                        "original"
                    };
                    let label = format!("#{} {}", index + 1, item.prompt);
                    let response = ui
                        .selectable_label(selected, label)
                        .on_hover_text(format!("{kind}, {}", item.mime_type));
                    if response.clicked() && !selected {
                        clicked = Some(index);
                    }
                }
            });

            if let Some(index) = clicked {
                app.select_result(index);
            }
        });
}
