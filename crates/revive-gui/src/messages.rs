use std::path::PathBuf;

use image::RgbaImage;
use revive_core::config::{ExportConfig, StudioConfig};
use revive_core::error::ReviveError;
use revive_core::filter::FilterPreset;
use revive_core::generation::Generation;
use revive_core::payload::ImagePayload;
use revive_core::raster::RasterRequest;
use revive_core::result::ResultItem;
use revive_core::view::ProbedDimensions;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Read an image from disk and wrap it as an original result.
    OpenFile { path: PathBuf },

    /// Probe and decode the before/after pair of a selected result.
    LoadPair {
        generation: Generation,
        before: Option<String>,
        after: String,
    },

    /// Rasterize pending edits onto the image behind `source`.
    ApplyEdits {
        generation: Generation,
        source: String,
        request: RasterRequest,
    },

    /// Write the image behind `source` to disk, baking `filter`.
    SaveImage {
        source: String,
        path: PathBuf,
        filter: FilterPreset,
        export: ExportConfig,
        upscale: bool,
    },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    Opened {
        item: ResultItem,
    },

    /// Dimensions and decoded pixels of one pair, tagged with its probe.
    PairLoaded {
        generation: Generation,
        dimensions: Result<ProbedDimensions, ReviveError>,
        before: Option<RgbaImage>,
        after: Option<RgbaImage>,
    },

    EditsApplied {
        generation: Generation,
        source: String,
        result: Result<ImagePayload, ReviveError>,
    },

    ImageSaved {
        path: PathBuf,
    },
    ConfigImported {
        config: StudioConfig,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
