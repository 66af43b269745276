//! # arcade-db
//!
//! Read-side data access for Arcade delivery:
//! - **PostgreSQL** — projects, versions, custom-domain mappings
//! - **S3-compatible object storage** — published bundles, manifests, legacy markers

pub mod postgres;
pub mod repository;
pub mod storage;

use anyhow::Result;
use arcade_common::config::DatabaseConfig;
use sqlx::PgPool;

/// Shared database state passed to the delivery service.
#[derive(Clone)]
pub struct Database {
    pub pg: PgPool,
}

impl Database {
    /// Connect to PostgreSQL.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        tracing::info!("Connecting to PostgreSQL...");
        let pg = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to PostgreSQL");
        Ok(Self { pg })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pg).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}
