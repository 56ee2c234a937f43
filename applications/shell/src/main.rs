//! Cadence - terminal audio player shell
use anyhow::Context;
use cadence_playback::PlayerControls;
use cadence_shell::{
    clock_engine::{demo_playlist, ClockEngine},
    config::{LogSettings, ShellConfig},
    ui,
};
use clap::Parser;
use std::{fs::OpenOptions, path::PathBuf, sync::Arc, sync::Mutex};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence terminal audio player", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadence.toml if present)
    #[arg(short, long, env = "CADENCE_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Number of generated tracks in the demo playlist
    #[arg(long, default_value_t = 12)]
    demo_tracks: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ShellConfig::load(cli.config.as_deref()).context("load configuration")?;
    init_logging(&config.log)?;

    info!("Starting Cadence with {} demo tracks", cli.demo_tracks);
    let engine = Arc::new(ClockEngine::new(
        demo_playlist(cli.demo_tracks),
        &config.engine,
    ));
    let ticker = engine.start();

    let controls = PlayerControls::mount(engine.clone(), engine.as_ref(), config.controls.clone())
        .context("mount player controls")?;
    let result = ui::run(controls).await;

    ticker.abort();
    info!("Cadence stopped");
    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(log: &LogSettings) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log.file)
        .with_context(|| format!("open log file {}", log.file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log.filter.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}
