//! artist-relay - catalog aggregation relay
//!
//! `GET /search/{name}` looks the artist up in the music catalog, collects its
//! related artists, fetches every related artist's top tracks in parallel,
//! and returns the whole tree as one JSON document.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use relay_common::config::{resolve_config, ConfigOverrides, ConfigSource};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_server::catalog::CatalogClient;
use relay_server::services::ArtistAggregator;
use relay_server::{build_router, AppState};

/// Command-line arguments for artist-relay
#[derive(Parser, Debug)]
#[command(name = "artist-relay")]
#[command(about = "Artist search relay with related-artist top tracks")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory with the static front end
    #[arg(long, env = "RELAY_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Catalog API base URL
    #[arg(long, env = "RELAY_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Market (country code) for top-tracks lookups
    #[arg(long, env = "RELAY_MARKET")]
    market: Option<String>,

    /// Bearer token forwarded to the catalog API
    #[arg(long, env = "RELAY_CATALOG_TOKEN", hide_env_values = true)]
    catalog_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RELAY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            public_dir: self.public_dir.clone(),
            catalog_base_url: self.catalog_url.clone(),
            market: self.market.clone(),
            bearer_token: self.catalog_token.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) = resolve_config(args.config.as_deref(), args.overrides())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "relay_server={level},artist_relay={level},tower_http={level}",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting artist-relay v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &source {
        ConfigSource::File(path) => info!("Configuration: {}", path.display()),
        ConfigSource::Defaults => warn!("No configuration file found, using built-in defaults"),
    }

    let catalog = CatalogClient::new(&config.catalog).context("Failed to create catalog client")?;
    info!(
        base_url = %catalog.base_url(),
        market = %config.catalog.market,
        "Catalog client ready"
    );

    let aggregator = ArtistAggregator::new(Arc::new(catalog), config.catalog.market.clone());
    if !config.public_dir.is_dir() {
        warn!(
            "Public directory {} does not exist; static files will 404",
            config.public_dir.display()
        );
    }
    let state = AppState::new(aggregator, config.public_dir.clone());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
