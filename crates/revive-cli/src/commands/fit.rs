use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use revive_core::compare::ComparisonMode;
use revive_core::filter::FilterPreset;
use revive_core::geometry::{Container, Dimensions};
use revive_core::payload::ImagePayload;
use revive_core::view::{ProbedDimensions, Viewer};

use super::config;

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Shared view with a divider
    Slider,
    /// Two panes at the same visual height
    Side,
    /// After image only
    Single,
}

impl From<ModeArg> for ComparisonMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Slider => ComparisonMode::Slider,
            ModeArg::Side => ComparisonMode::Side,
            ModeArg::Single => ComparisonMode::Single,
        }
    }
}

#[derive(Args)]
pub struct FitArgs {
    /// After (edited) image
    pub after: PathBuf,

    /// Before image for comparison modes
    #[arg(long)]
    pub before: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_container)]
    pub container: (f64, f64),

    /// Comparison mode
    #[arg(long, value_enum, default_value = "slider")]
    pub mode: ModeArg,

    /// Also report pan guides at this zoom
    #[arg(long)]
    pub zoom: Option<f64>,

    /// TOML config file (defaults when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_container(s: &str) -> std::result::Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
    if !(w > 0.0 && h > 0.0) {
        return Err("container must be positive".into());
    }
    Ok((w, h))
}

fn probe(path: &Path) -> Result<Dimensions> {
    let payload = ImagePayload::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    payload
        .probe_dimensions()
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e.user_message()))
}

pub fn run(args: &FitArgs) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let after = probe(&args.after)?;
    let before = args.before.as_deref().map(probe).transpose()?;

    let mut viewer = Viewer::new(config);
    viewer.set_container(Container::sized(args.container.0, args.container.1));
    viewer.set_comparison_mode(args.mode.into());
    let generation = viewer.begin_dimension_probe();
    viewer.finish_dimension_probe(
        generation,
        Ok(ProbedDimensions {
            before,
            after: Some(after),
        }),
    )?;

    let plan = viewer.render_plan(FilterPreset::None);
    println!("Container:     {}x{}", args.container.0, args.container.1);
    println!("After:         {}", after);
    if let Some(b) = before {
        println!("Before:        {}", b);
    }
    println!("Mode:          {}", plan.mode);
    if let Some(content) = viewer.effective_content_size() {
        println!("Content:       {}x{}", content.width, content.height);
    }
    println!("Fit all:       {:.4} ({:.1}%)", viewer.view().zoom, viewer.view().zoom * 100.0);
    for surface in plan.surfaces() {
        println!(
            "  {:?} scale {:.4}, top-left ({:.1}, {:.1})",
            surface.role, surface.scale, surface.corners[0].x, surface.corners[0].y
        );
    }

    viewer.fit_to_height();
    println!("Fit to height: {:.4} ({:.1}%)", viewer.view().zoom, viewer.view().zoom * 100.0);

    if let Some(zoom) = args.zoom {
        viewer.zoom_to(zoom);
        let guides = viewer.pan_guides();
        println!(
            "Pan guides at {:.1}%: up={} down={} left={} right={}",
            viewer.view().zoom * 100.0,
            guides.up,
            guides.down,
            guides.left,
            guides.right
        );
    }

    Ok(())
}
