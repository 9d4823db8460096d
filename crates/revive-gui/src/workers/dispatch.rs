use std::sync::mpsc;

use crate::messages::{WorkerCommand, WorkerResult};

use super::{edit, io};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("revive-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

pub(crate) fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

pub(crate) fn send_log(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    msg: impl Into<String>,
) {
    send(
        tx,
        ctx,
        WorkerResult::Log {
            message: msg.into(),
        },
    );
}

pub(crate) fn send_error(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    msg: impl Into<String>,
) {
    send(
        tx,
        ctx,
        WorkerResult::Error {
            message: msg.into(),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::OpenFile { path } => {
                io::handle_open_file(&path, &tx, &ctx);
            }
            WorkerCommand::LoadPair {
                generation,
                before,
                after,
            } => {
                io::handle_load_pair(generation, before.as_deref(), &after, &tx, &ctx);
            }
            WorkerCommand::ApplyEdits {
                generation,
                source,
                request,
            } => {
                edit::handle_apply_edits(generation, source, &request, &tx, &ctx);
            }
            WorkerCommand::SaveImage {
                source,
                path,
                filter,
                export,
                upscale,
            } => {
                io::handle_save_image(&source, &path, filter, &export, upscale, &tx, &ctx);
            }
        }
    }
    tracing::debug!("Worker channel closed, exiting");
}
