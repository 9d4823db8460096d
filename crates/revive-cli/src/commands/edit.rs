use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use revive_core::config::StudioConfig;
use revive_core::edit::{EditParameters, EditSession};
use revive_core::filter::{upscale_2x, FilterPreset};
use revive_core::geometry::{Dimensions, Vec2};
use revive_core::payload::{encode_image, extension_for_mime, ImagePayload};
use revive_core::raster::{self, RasterRequest};
use revive_core::view::ViewState;
use tracing::debug;

use super::config;
use crate::summary::print_edit_summary;

/// Crop rectangle in rotated-image pixels.
#[derive(Clone, Copy, Debug)]
pub struct CropArg {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn parse_crop(s: &str) -> std::result::Result<CropArg, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid crop '{s}': {e}"))?;
    match parts.as_slice() {
        &[x, y, width, height] if width > 0.0 && height > 0.0 => Ok(CropArg {
            x,
            y,
            width,
            height,
        }),
        &[_, _, _, _] => Err("crop width and height must be positive".into()),
        _ => Err(format!("expected X,Y,W,H, got '{s}'")),
    }
}

fn parse_filter(s: &str) -> std::result::Result<FilterPreset, String> {
    FilterPreset::from_id(s).ok_or_else(|| {
        let ids: Vec<&str> = FilterPreset::ALL.iter().map(|p| p.id()).collect();
        format!("unknown filter '{s}' (expected one of: {})", ids.join(", "))
    })
}

#[derive(Args)]
pub struct EditArgs {
    /// Input image files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Directory for outputs (defaults to each input's directory)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Rotate clockwise by 90° this many times
    #[arg(long, default_value = "0")]
    pub rotate_right: u32,

    /// Rotate counter-clockwise by 90° this many times
    #[arg(long, default_value = "0")]
    pub rotate_left: u32,

    /// Mirror horizontally
    #[arg(long)]
    pub flip: bool,

    /// Fine rotation in degrees (clamped to the configured limit)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub straighten: f64,

    /// Crop as X,Y,W,H in pixels of the rotated image
    #[arg(long, value_parser = parse_crop)]
    pub crop: Option<CropArg>,

    /// Bake a filter preset into the output
    #[arg(long, value_parser = parse_filter)]
    pub filter: Option<FilterPreset>,

    /// Export at twice the size with a light contrast and color lift
    #[arg(long)]
    pub upscale: bool,

    /// TOML config file (defaults when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Drive an edit session the way the toolbar would.
fn build_params(args: &EditArgs, config: &StudioConfig) -> EditParameters {
    let mut session = EditSession::new(
        ViewState::centered(1.0),
        config.edit.straighten_limit_deg,
    );
    for _ in 0..args.rotate_right % 4 {
        session.rotate_right_90();
    }
    for _ in 0..args.rotate_left % 4 {
        session.rotate_left_90();
    }
    if args.flip {
        session.flip_horizontal();
    }
    session.set_straighten(args.straighten);
    if let Some(crop) = args.crop {
        session.toggle_crop_mode();
        session.begin_crop(Vec2::new(crop.x, crop.y));
        session.update_crop(Vec2::new(crop.x + crop.width, crop.y + crop.height));
        session.end_crop();
    }
    session.params_for_apply()
}

fn output_path(input: &Path, args: &EditArgs, mime_type: &str) -> PathBuf {
    if let Some(ref out) = args.output {
        return out.clone();
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| input.parent().unwrap_or(Path::new(".")).to_path_buf());
    dir.join(format!("{stem}_edited.{}", extension_for_mime(mime_type)))
}

fn edit_one(
    input: &Path,
    args: &EditArgs,
    params: &EditParameters,
    filter: FilterPreset,
    config: &StudioConfig,
) -> Result<(PathBuf, Dimensions)> {
    let payload = ImagePayload::from_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let image = payload
        .decode()
        .map_err(|e| anyhow::anyhow!("{}: {}", input.display(), e.user_message()))?;
    let source = Dimensions::new(image.width(), image.height());

    let request = RasterRequest::for_image(source, params.clone(), config.export.clone());
    let mut pixels = raster::render(&image, &request)
        .with_context(|| format!("Failed to rasterize {}", input.display()))?;
    if args.upscale {
        pixels = upscale_2x(&pixels, filter);
    } else {
        filter.apply(&mut pixels);
    }

    let encoded = encode_image(&pixels, &payload.mime_type, &config.export)?;
    let out = output_path(input, args, &encoded.mime_type);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    encoded
        .save(&out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    debug!(input = %input.display(), output = %out.display(), "Edited");

    Ok((out, Dimensions::new(pixels.width(), pixels.height())))
}

pub fn run(args: &EditArgs) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output takes a single input; use --out-dir for several");
    }
    let config = config::load(args.config.as_deref())?;
    let params = build_params(args, &config);
    let filter = args.filter.unwrap_or(config.compare.default_filter);

    print_edit_summary(&params, filter, args.inputs.len());

    if args.inputs.len() == 1 {
        let (out, dims) = edit_one(&args.inputs[0], args, &params, filter, &config)?;
        println!("Saved {} to {}", dims, out.display());
        return Ok(());
    }

    let pb = ProgressBar::new(args.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Editing [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut failed = 0usize;
    for input in &args.inputs {
        pb.set_message(
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match edit_one(input, args, &params, filter, &config) {
            Ok((out, dims)) => pb.println(format!("Saved {} to {}", dims, out.display())),
            Err(e) => {
                failed += 1;
                pb.println(format!("Skipped {}: {e:#}", input.display()));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if failed > 0 {
        bail!("{failed} of {} inputs failed", args.inputs.len());
    }
    Ok(())
}
