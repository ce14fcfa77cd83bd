//! cmap-server - Community Map service
//!
//! Accepts a member CSV on POST /generate-map, geocodes rows without
//! coordinates and returns an interactive HTML map.

use anyhow::{Context, Result};
use clap::Parser;
use cmap_common::config::{ConfigOverrides, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cmap_server::geocode::NominatimClient;
use cmap_server::{build_router, AppState};

/// Command-line options; each overrides ENV and config file
#[derive(Debug, Parser)]
#[command(name = "cmap-server", version, about = "Community map generator")]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Verbose logging (true/false)
    #[arg(long)]
    debug: Option<bool>,

    /// Nominatim-compatible geocoder base URL
    #[arg(long)]
    geocoder_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            debug: args.debug,
            geocoder_url: args.geocoder_url,
            config_file: args.config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let overrides = ConfigOverrides::from(Args::parse());
    let config = ServerConfig::resolve(&overrides).context("Failed to resolve configuration")?;

    // RUST_LOG still wins when set
    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!(
        "Starting Community Map (cmap-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        debug = config.debug,
        geocoder = %config.geocoder_url,
        "Configuration resolved"
    );

    let resolver =
        NominatimClient::new(&config.geocoder_url).context("Failed to create geocoding client")?;
    let state = AppState::new(Arc::new(resolver));
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("cmap-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
