use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use revive_core::payload::ImagePayload;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let payload = ImagePayload::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let dims = payload
        .probe_dimensions()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    println!("File:        {}", args.file.display());
    println!("Mime type:   {}", payload.mime_type);
    println!("Dimensions:  {}", dims);
    if dims.height > 0 {
        println!("Aspect:      {:.3}", dims.width as f64 / dims.height as f64);
    }
    println!("File size:   {:.1} KB", payload.bytes.len() as f64 / 1024.0);

    Ok(())
}
