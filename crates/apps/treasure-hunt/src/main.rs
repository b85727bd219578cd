use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use treasure_audio::SoftwareAudioEngine;
use treasure_devices::LogHaptics;
use treasure_hunt::{load_config, HeadlessHost, HostConfig, HuntConfig, TreasureHunt};

/// Find the floating cube by looking at it, then pull the trigger
#[derive(Parser, Debug)]
#[command(name = "treasure-hunt", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to render
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seed for target repositioning (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Pull the trigger every N frames (0 disables the trigger)
    #[arg(long, default_value_t = 90)]
    trigger_every: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => HuntConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let audio = SoftwareAudioEngine::shared(config.audio.engine_config());
    let mut hunt = TreasureHunt::new(config, audio, LogHaptics::new());

    let host = HeadlessHost::new(HostConfig {
        frames: args.frames,
        trigger_every: args.trigger_every,
        ..HostConfig::default()
    });
    let summary = host.run(&mut hunt)?;

    let pulses = hunt.haptics().pulses().len();
    info!(
        "Rendered {} frames ({} eye passes, {} with the target in view), {} triggers, {} pulses",
        summary.frames,
        summary.draws.eyes,
        summary.draws.found_cubes,
        summary.triggers,
        pulses
    );
    info!(
        "Target ended at {:?}, distance {:.2}",
        hunt.scene().target().position(),
        hunt.scene().target().distance()
    );
    Ok(())
}
