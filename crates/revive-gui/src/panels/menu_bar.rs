use revive_core::config::StudioConfig;
use revive_core::payload::extension_for_mime;

use crate::app::ReviveApp;
use crate::messages::{WorkerCommand, WorkerResult};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"];

pub fn show(ctx: &egui::Context, app: &mut ReviveApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_file(app);
                }

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui.add(egui::Button::new("Save As...").shortcut_text(ctx.format_shortcut(&save_shortcut))).clicked() {
                    ui.close();
                    save_file(app, false);
                }

                let has_item = app.ui_state.selected_item().is_some();
                if ui.add_enabled(has_item, egui::Button::new("Save 2x...")).clicked() {
                    ui.close();
                    save_file(app, true);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let has_image = app.viewer.has_image();
                if ui.add_enabled(has_image, egui::Button::new("Fit")).clicked() {
                    ui.close();
                    app.viewer.fit_all();
                }
                if ui.add_enabled(has_image, egui::Button::new("Fit Height")).clicked() {
                    ui.close();
                    app.viewer.fit_to_height();
                }
                if ui.add_enabled(has_image, egui::Button::new("Actual Size")).clicked() {
                    ui.close();
                    app.viewer.reset_zoom();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_file(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            save_file(app, false);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_file(app: &mut ReviveApp) {
    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::OpenFile { path });
        }
    });
}

fn save_file(app: &mut ReviveApp, upscale: bool) {
    let Some(item) = app.ui_state.selected_item() else {
        app.ui_state.add_log("Nothing to save".into());
        return;
    };
    if item.is_video() {
        app.ui_state.add_log("Video results cannot be saved as images".into());
        return;
    }
    let source = item.image_url.clone();
    let ext = extension_for_mime(&item.mime_type);
    let filter = app.ui_state.filter;
    let export = app.viewer.config().export.clone();
    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(ext.to_uppercase(), &[ext])
            .set_file_name(if upscale {
                format!("revive_result_2x.{ext}")
            } else {
                format!("revive_result.{ext}")
            })
            .save_file()
        {
            let _ = cmd_tx.send(WorkerCommand::SaveImage {
                source,
                path,
                filter,
                export,
                upscale,
            });
        }
    });
}

fn import_config(app: &mut ReviveApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let result = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                toml::from_str::<StudioConfig>(&content).map_err(|e| e.to_string())
            })
            .and_then(|config| config.validate().map(|()| config).map_err(|e| e.to_string()));
        let _ = match result {
            Ok(config) => result_tx.send(WorkerResult::ConfigImported { config }),
            Err(e) => result_tx.send(WorkerResult::Error {
                message: format!("Failed to import {}: {e}", path.display()),
            }),
        };
    });
}

fn export_config(app: &mut ReviveApp) {
    let config = app.viewer.config().clone();
    let result_tx = app.result_tx.clone();

    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("revive_config.toml")
            .save_file()
        {
            let written = toml::to_string_pretty(&config)
                .map_err(anyhow::Error::from)
                .and_then(|content| std::fs::write(&path, content).map_err(anyhow::Error::from));
            let message = match written {
                Ok(()) => format!("Config exported to {}", path.display()),
                Err(e) => format!("Failed to export config: {e}"),
            };
            let _ = result_tx.send(WorkerResult::Log { message });
        }
    });
}
