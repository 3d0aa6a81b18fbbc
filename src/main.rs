//! stemd - Stem Extraction Service
//!
//! Accepts a video URL, extracts its audio (yt-dlp), separates it into
//! vocals/drums/bass/other stems (demucs), transcodes each stem to MP3
//! (ffmpeg), and serves the results over a small polling HTTP API.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use stemd::config::{Cli, Config};
use stemd::services::{sweeper, CommandToolSuite};
use stemd::store::{DataLayout, StatusStore};
use stemd::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting stemd (Stem Extraction Service)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration: CLI → env → TOML → defaults
    let config = Config::resolve(Cli::parse())?;
    info!("Data root: {}", config.data_root.display());

    // Create the four data directories if missing
    let layout = DataLayout::new(&config.data_root);
    layout.ensure_directories()?;
    let store = StatusStore::new(layout);

    let tools = Arc::new(CommandToolSuite::new(&config.tools));

    let bind = config.bind;
    let retention = chrono::Duration::hours(config.retention_hours as i64);
    let state = AppState::new(config, store, tools);

    // One retention sweep at startup, off the accept path
    let sweep_store = state.store.clone();
    tokio::spawn(async move {
        sweeper::sweep_expired(&sweep_store, retention);
    });

    let app = stemd::build_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
