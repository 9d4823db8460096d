use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use revive_core::config::StudioConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the default StudioConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let toml_str = toml::to_string_pretty(&StudioConfig::default())?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}

/// Load a TOML config, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<StudioConfig> {
    let Some(path) = path else {
        return Ok(StudioConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: StudioConfig =
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}
