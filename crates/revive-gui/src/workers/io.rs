use std::path::Path;
use std::sync::mpsc;

use anyhow::Context as _;
use image::RgbaImage;
use revive_core::config::ExportConfig;
use revive_core::error::ReviveError;
use revive_core::filter::{upscale_2x, FilterPreset};
use revive_core::generation::Generation;
use revive_core::geometry::Dimensions;
use revive_core::payload::{self, encode_image, ImagePayload};
use revive_core::result::ResultItem;
use revive_core::view::ProbedDimensions;

use crate::messages::WorkerResult;

use super::{send, send_error};

pub(super) fn handle_open_file(path: &Path, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) {
    match ImagePayload::from_path(path) {
        Ok(payload) => {
            let item = ResultItem::original(path.to_string_lossy(), payload.mime_type);
            send(tx, ctx, WorkerResult::Opened { item });
        }
        Err(e) => send_error(tx, ctx, format!("Failed to open {}: {e}", path.display())),
    }
}

/// Probe both images of a pair and decode them for display.
pub(super) fn handle_load_pair(
    generation: Generation,
    before: Option<&str>,
    after: &str,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let loaded = load_pair(before, after);
    let (dimensions, before, after) = match loaded {
        Ok((dims, before, after)) => (Ok(dims), before, Some(after)),
        Err(e) => (Err(e), None, None),
    };
    send(
        tx,
        ctx,
        WorkerResult::PairLoaded {
            generation,
            dimensions,
            before,
            after,
        },
    );
}

type LoadedPair = (ProbedDimensions, Option<RgbaImage>, RgbaImage);

fn load_pair(before: Option<&str>, after: &str) -> Result<LoadedPair, ReviveError> {
    let (after_dims, after_pixels) = load_one(after)?;
    let (before_dims, before_pixels) = match before {
        Some(reference) => {
            let (dims, pixels) = load_one(reference)?;
            (Some(dims), Some(pixels))
        }
        None => (None, None),
    };
    Ok((
        ProbedDimensions {
            before: before_dims,
            after: Some(after_dims),
        },
        before_pixels,
        after_pixels,
    ))
}

fn load_one(reference: &str) -> Result<(Dimensions, RgbaImage), ReviveError> {
    let probe_err = |e: ReviveError| match e {
        ReviveError::DimensionProbe(_) => e,
        other => ReviveError::DimensionProbe(other.to_string()),
    };
    let payload = ImagePayload::load(reference).map_err(probe_err)?;
    let dims = payload.probe_dimensions()?;
    let pixels = payload.decode().map_err(probe_err)?.to_rgba8();
    Ok((dims, pixels))
}

pub(super) fn handle_save_image(
    source: &str,
    path: &Path,
    filter: FilterPreset,
    export: &ExportConfig,
    upscale: bool,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match save_image(source, path, filter, export, upscale) {
        Ok(()) => send(
            tx,
            ctx,
            WorkerResult::ImageSaved {
                path: path.to_path_buf(),
            },
        ),
        Err(e) => send_error(tx, ctx, format!("{e:#}")),
    }
}

/// Write the image behind `source`. Without a filter or upscale the bytes go
/// out as-is; otherwise the pixels are reworked and re-encoded in the
/// source's own format.
fn save_image(
    source: &str,
    path: &Path,
    filter: FilterPreset,
    export: &ExportConfig,
    upscale: bool,
) -> anyhow::Result<()> {
    let payload = ImagePayload::load(source).context("Failed to load image for saving")?;
    if filter.is_none() && !upscale {
        payload
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(());
    }

    let mut pixels = payload.decode()?.to_rgba8();
    if upscale {
        pixels = upscale_2x(&pixels, filter);
    } else {
        filter.apply(&mut pixels);
    }
    let encoded = encode_image(&pixels, &payload.mime_type, export)?;
    encoded
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(
        source = if payload::is_data_url(source) { "data url" } else { source },
        filter = filter.id(),
        upscale,
        "Saved reworked image"
    );
    Ok(())
}
