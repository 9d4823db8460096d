use std::sync::mpsc;
use std::time::Instant;

use revive_core::generation::Generation;
use revive_core::payload::ImagePayload;
use revive_core::raster::{self, RasterRequest};

use crate::messages::WorkerResult;

use super::{send, send_log};

/// Rasterize the pending edits. The result always goes back to the UI,
/// which decides from the generation whether it still matters.
pub(super) fn handle_apply_edits(
    generation: Generation,
    source: String,
    request: &RasterRequest,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let start = Instant::now();
    let result =
        ImagePayload::load(&source).and_then(|payload| raster::rasterize_payload(&payload, request));

    if result.is_ok() {
        send_log(
            tx,
            ctx,
            format!("Edits rasterized in {:.0}ms", start.elapsed().as_secs_f64() * 1000.0),
        );
    }

    send(
        tx,
        ctx,
        WorkerResult::EditsApplied {
            generation,
            source,
            result,
        },
    );
}
