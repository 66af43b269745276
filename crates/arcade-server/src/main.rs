//! # Arcade Server
//!
//! Serves published games and apps straight out of object storage:
//! resolves the project and version for each request, then streams the file
//! back with the right caching and embedding headers.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use arcade_common::config::AppConfig;
use arcade_db::{Database, storage::StorageClient};
use arcade_delivery::{AppState, Backend, build_router, service::DeliveryService};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "arcade", version, about = "Published-content delivery server")]
struct Cli {
    /// Config file base name (without extension).
    #[arg(long, env = "ARCADE_CONFIG")]
    config: Option<String>,

    /// Run database migrations before serving.
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = arcade_common::config::load(cli.config.as_deref())?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcade=debug,tower_http=info".into()),
        )
        .with_target(true)
        .init();

    tracing::info!("Starting Arcade delivery v{}", env!("CARGO_PKG_VERSION"));

    let backend = connect_backend(&config, cli.migrate).await?;
    let router = build_router(AppState { backend });

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid server.host")?,
        config.server.port,
    );
    tracing::info!(mount = %config.delivery.mount, "Delivery listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the datastore and storage backends.
///
/// Missing settings are not fatal: the server still starts so the platform
/// sees a 500 and `/health` reports degraded.
async fn connect_backend(config: &AppConfig, migrate: bool) -> anyhow::Result<Backend> {
    let missing = config.missing_settings();
    if !missing.is_empty() {
        tracing::error!(?missing, "Delivery backends are not configured; serving 500s");
        return Ok(Backend::Unconfigured {
            missing: missing.into_iter().map(String::from).collect(),
        });
    }

    let db = Database::connect(&config.database).await?;
    if migrate {
        db.migrate().await?;
    }

    let storage = StorageClient::new(&config.storage)?;
    tracing::info!(bucket = storage.bucket(), "Object storage ready");

    let store = Arc::new(db);
    let service = DeliveryService::new(store.clone(), Arc::new(storage), &config.delivery);

    Ok(Backend::Ready {
        service: Arc::new(service),
        store,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
