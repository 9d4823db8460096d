mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "revive", about = "Non-destructive photo transform and comparison tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions and format
    Info(commands::info::InfoArgs),
    /// Compute fit zoom and pan guides for a container
    Fit(commands::fit::FitArgs),
    /// Rotate, flip, straighten and crop images
    Edit(commands::edit::EditArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Fit(args) => commands::fit::run(args),
        Commands::Edit(args) => commands::edit::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
