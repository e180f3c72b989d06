//! Command-line front end: writes `<name>.ico` and `<name>_preview.png`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use server_glyph::{package, IconConfig};

/// Generate the secure-server application icon.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory the icon and preview are written to (created if missing).
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// File stem for the generated files.
    #[arg(short, long, default_value = "icon")]
    name: String,

    /// JSON file overriding sizes, colors or segment/light counts.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<IconConfig> {
    let Some(path) = path else {
        return Ok(IconConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    IconConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    info!("generating icon");
    let output = package(&config)?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let ico_path = args.output.join(format!("{}.ico", args.name));
    fs::write(&ico_path, &output.container)
        .with_context(|| format!("failed to write {}", ico_path.display()))?;
    info!("icon saved to {}", ico_path.display());

    let preview_path = args.output.join(format!("{}_preview.png", args.name));
    fs::write(&preview_path, &output.preview)
        .with_context(|| format!("failed to write {}", preview_path.display()))?;
    info!("preview saved to {}", preview_path.display());

    let sizes: Vec<_> = output.sizes.iter().map(|s| format!("{s}x{s}")).collect();
    info!("generated {} sizes: {}", sizes.len(), sizes.join(", "));
    Ok(())
}
