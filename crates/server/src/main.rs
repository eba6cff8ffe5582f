//! Baler server binary.

use anyhow::{Context, Result};
use baler_archive::{ArchiveBuilder, Staging};
use baler_core::config::AppConfig;
use baler_server::quota::{MemoryQuotaStore, QuotaStore};
use baler_server::{AppState, bootstrap, create_router};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Baler - bundle uploaded files into downloadable archives
#[derive(Parser, Debug)]
#[command(name = "balerd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "BALER_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Baler v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!(
            "No config file found at {}, using defaults and environment",
            args.config
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("BALER_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Create staging and output directories before accepting requests
    bootstrap::ensure_directories(&config).await?;

    // Initialize the archive pipeline
    let staging = Arc::new(
        Staging::new(&config.paths.upload_dir)
            .await
            .context("failed to initialize staging area")?,
    );
    let builder = Arc::new(
        ArchiveBuilder::new(&config.paths.download_dir)
            .await
            .context("failed to initialize archive builder")?,
    );
    let quota: Arc<dyn QuotaStore> = Arc::new(MemoryQuotaStore::new());

    // Create application state
    let state = AppState::new(config.clone(), staging, builder, quota);

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    // Start server with ConnectInfo so handlers can key quotas by client address
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
