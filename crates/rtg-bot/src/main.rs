//! rtg quoting bot - Entry Point
//!
//! Reads exchange events as JSON lines, writes commands as JSON lines on
//! stdout. Logs go to stderr.

use anyhow::Result;
use clap::Parser;
use rtg_bot::{AppConfig, AppError, Application, JsonLinesSink};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Single-instrument market-making quoter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via RTG_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Event file to replay instead of the configured feed source
    #[arg(short, long)]
    events: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config path: CLI arg > RTG_CONFIG env var > default
    let loaded = AppConfig::load(args.config)?;
    let mut config = loaded.config;
    if let Some(events) = args.events {
        config.feed.source = Some(events);
    }

    rtg_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting rtg-bot v{}", env!("CARGO_PKG_VERSION"));
    if !loaded.from_file {
        warn!(path = %loaded.path, "Config file not found, using defaults");
    }
    info!(
        config_path = %loaded.path,
        source = config.feed.source.as_deref().unwrap_or("stdin"),
        "Configuration loaded"
    );

    let (tx, rx) = mpsc::channel(config.feed.channel_capacity);
    let feed = rtg_bot::feed::spawn_feed(config.feed.source.clone(), tx);

    let app = Application::new(&config, Box::new(JsonLinesSink::stdout()))?;
    let snapshot = app.run(rx).await?;

    let stats = feed
        .await
        .map_err(|e| AppError::FeedTask(e.to_string()))??;
    info!(
        lines = stats.lines,
        rejected = stats.rejected,
        position = snapshot.position,
        "Session complete"
    );

    Ok(())
}
