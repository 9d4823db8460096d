use std::sync::mpsc;

use image::RgbaImage;
use revive_core::error::ReviveError;
use revive_core::generation::{Generation, GenerationCounter};
use revive_core::result::ResultItem;
use revive_core::view::Viewer;

use crate::convert::rgba_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::{LoadedImage, UIState, ViewportState};
use crate::workers;

pub struct ReviveApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub viewer: Viewer,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    applies: GenerationCounter,
    pending_apply: Option<Generation>,
}

impl ReviveApp {
    pub fn new(ctx: &egui::Context) -> std::io::Result<Self> {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = workers::spawn_worker(result_tx.clone(), ctx.clone())?;

        let viewer = Viewer::default();
        let ui_state = UIState {
            filter: viewer.config().compare.default_filter,
            ..Default::default()
        };

        Ok(Self {
            cmd_tx,
            result_tx,
            result_rx,
            viewer,
            ui_state,
            viewport: ViewportState::default(),
            applies: GenerationCounter::new(),
            pending_apply: None,
        })
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::Opened { item } => {
                    self.ui_state.add_log(format!("Opened: {}", item.image_url));
                    self.ui_state.results.clear();
                    self.ui_state.original_url = Some(item.image_url.clone());
                    self.ui_state.results.push(item);
                    self.select_result(0);
                }
                WorkerResult::PairLoaded {
                    generation,
                    dimensions,
                    before,
                    after,
                } => match self.viewer.finish_dimension_probe(generation, dimensions) {
                    Ok(true) => {
                        self.viewport.loading = false;
                        self.upload_pair(ctx, before, after);
                    }
                    Ok(false) => {}
                    Err(e) => {
                        self.viewport.loading = false;
                        self.viewport.clear();
                        self.ui_state.add_log(format!("ERROR: {}", e.user_message()));
                    }
                },
                WorkerResult::EditsApplied {
                    generation,
                    source,
                    result,
                } => self.finish_apply(generation, source, result),
                WorkerResult::ImageSaved { path } => {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
                WorkerResult::ConfigImported { config } => {
                    self.ui_state.filter = config.compare.default_filter;
                    self.viewer.set_config(config);
                    self.ui_state.add_log("Config imported".into());
                }
                WorkerResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    fn upload_pair(
        &mut self,
        ctx: &egui::Context,
        before: Option<RgbaImage>,
        after: Option<RgbaImage>,
    ) {
        let max_side = ctx.input(|i| i.max_texture_side);
        let load = |name: &str, pixels: RgbaImage| {
            let plain = ctx.load_texture(
                name,
                rgba_to_color_image(&pixels, max_side),
                egui::TextureOptions::LINEAR,
            );
            LoadedImage {
                pixels,
                plain,
                filtered: None,
            }
        };
        self.viewport.before = before.map(|p| load("before", p));
        self.viewport.after = after.map(|p| load("after", p));
    }

    /// Show result `index`: leave edit mode, drop any running apply and
    /// start loading the pair behind it.
    pub fn select_result(&mut self, index: usize) {
        let Some(item) = self.ui_state.results.get(index).cloned() else {
            return;
        };
        self.drop_pending_apply();
        self.ui_state.selected = Some(index);
        self.viewport.clear();
        self.viewport.loading = true;
        self.viewport.viewing_label = item.prompt.clone();

        let generation = self.viewer.select_result(&item);
        let before = item
            .before_url(self.ui_state.original_url.as_deref())
            .map(str::to_string);
        self.send_command(WorkerCommand::LoadPair {
            generation,
            before,
            after: item.image_url,
        });
    }

    pub fn enter_edit(&mut self) {
        if let Err(e) = self.viewer.enter_edit() {
            self.ui_state.add_log(format!("ERROR: {}", e.user_message()));
        }
    }

    /// Hand the pending edits to the worker. The session stays open until
    /// the rasterized image comes back.
    pub fn apply_edits(&mut self) {
        if self.ui_state.applying {
            return;
        }
        let Some(source) = self.ui_state.selected_item().map(|i| i.image_url.clone()) else {
            return;
        };
        let request = match self.viewer.apply_request() {
            Ok(r) => r,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {}", e.user_message()));
                return;
            }
        };
        let generation = self.applies.advance();
        self.pending_apply = Some(generation);
        self.ui_state.applying = true;
        self.send_command(WorkerCommand::ApplyEdits {
            generation,
            source,
            request,
        });
    }

    fn finish_apply(
        &mut self,
        generation: Generation,
        source: String,
        result: Result<revive_core::payload::ImagePayload, ReviveError>,
    ) {
        if self.pending_apply != Some(generation) || !self.applies.is_current(generation) {
            tracing::debug!(%generation, "Dropping stale apply result");
            return;
        }
        self.pending_apply = None;
        self.ui_state.applying = false;

        match result {
            Ok(payload) => {
                self.viewer.finish_apply();
                self.ui_state.add_log(format!(
                    "Edits applied ({}, {} KiB)",
                    payload.mime_type,
                    payload.bytes.len() / 1024
                ));
                self.ui_state
                    .results
                    .push(ResultItem::edited(&payload, source));
                self.select_result(self.ui_state.results.len() - 1);
            }
            Err(e) if e.is_silent() => {
                tracing::warn!("Apply aborted: {e}");
            }
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {}", e.user_message()));
            }
        }
    }

    pub fn cancel_edits(&mut self) {
        self.drop_pending_apply();
        self.viewer.cancel_edits();
    }

    fn drop_pending_apply(&mut self) {
        if self.pending_apply.take().is_some() {
            self.applies.advance();
        }
        self.ui_state.applying = false;
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

impl eframe::App for ReviveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::toolbar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::results::show(ctx, self);
        panels::viewport::show(ctx, self);

        // About dialog
        if self.ui_state.show_about {
            egui::Window::new("About Revive")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Revive");
                        ui.label("Photo Restoration Studio");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}
