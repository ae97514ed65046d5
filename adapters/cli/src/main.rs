#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that renders a Pazzers field descriptor to an image.

mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pazzers_game::{Config, Field};
use pazzers_resources::{AssetCatalog, FieldDescriptor};

use crate::scene::RenderOptions;

const DEFAULT_SEED: u64 = 0x7a55_e125_0f1e_1d00;

/// Render a field descriptor, optionally marking sampled spawn positions.
#[derive(Debug, Parser)]
#[command(name = "pazzers", version)]
struct Args {
    /// Path to the field descriptor TOML file.
    #[arg(long)]
    descriptor: PathBuf,
    /// Destination of the rendered image; the extension selects the format.
    #[arg(long, default_value = "field.png")]
    output: PathBuf,
    /// Number of distinct spawn positions to sample and mark.
    #[arg(long, default_value_t = 0)]
    players: usize,
    /// Seed used when sampling spawn positions.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Border in pixels drawn around the field.
    #[arg(long, default_value_t = 0)]
    margin: u32,
    /// Converts the final image to grayscale.
    #[arg(long)]
    grayscale: bool,
}

/// Entry point for the Pazzers command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let descriptor = FieldDescriptor::from_path(&args.descriptor).with_context(|| {
        format!(
            "failed to read field descriptor {}",
            args.descriptor.display()
        )
    })?;
    let assets = AssetCatalog::load(&descriptor).context("failed to load field assets")?;
    let mut field = Field::new(&descriptor, &assets, Config::new(args.seed))
        .context("failed to build field")?;

    let spawns = field
        .get_spawn_positions(args.players)
        .with_context(|| format!("failed to place {} players", args.players))?;
    for (player, position) in spawns.iter().enumerate() {
        info!("player {player} spawns at ({}, {})", position.x, position.y);
    }

    let options = RenderOptions {
        margin: args.margin,
        grayscale: args.grayscale,
    };
    let canvas = scene::render(&field, &spawns, options)?;
    canvas
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        "rendered {}x{} field to {} ({}x{} px)",
        field.width(),
        field.height(),
        args.output.display(),
        canvas.width(),
        canvas.height()
    );
    Ok(())
}
