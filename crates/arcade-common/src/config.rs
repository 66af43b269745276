//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults
//!
//! The loaded [`AppConfig`] is an immutable value handed to constructors;
//! nothing in the delivery path reads process environment on its own.

use serde::Deserialize;

/// Default entrypoint served when a version does not declare one.
pub const DEFAULT_ENTRYPOINT: &str = "index.html";

/// Load configuration from defaults, an optional config file, and `ARCADE__*` env vars.
///
/// `file` is the config file base name (without extension); `config` when `None`.
pub fn load(file: Option<&str>) -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = with_defaults(config::Config::builder())?
        // Optional config file
        .add_source(config::File::with_name(file.unwrap_or("config")).required(false))
        // Environment variables (ARCADE__SERVER__PORT, ARCADE__STORAGE__BUCKET, etc.)
        .add_source(
            config::Environment::with_prefix("ARCADE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("storage.endpoint", "")?
        .set_default("storage.bucket", "")?
        .set_default("storage.access_key", "")?
        .set_default("storage.secret_key", "")?
        .set_default("storage.region", "us-east-1")?
        .set_default("storage.force_path_style", true)?
        .set_default("delivery.mount", "play")?
        .set_default("delivery.default_entrypoint", DEFAULT_ENTRYPOINT)?
        .set_default("delivery.inject_router_patch", true)
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub delivery: DeliveryConfig,
}

impl AppConfig {
    /// Required settings that are still empty after loading.
    ///
    /// A non-empty result means the delivery backends cannot be built; the
    /// server keeps running and answers delivery requests with a 500.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.database.url.trim().is_empty() {
            missing.push("database.url");
        }
        if self.storage.bucket.trim().is_empty() {
            missing.push("storage.bucket");
        }
        if self.storage.access_key.trim().is_empty() {
            missing.push("storage.access_key");
        }
        if self.storage.secret_key.trim().is_empty() {
            missing.push("storage.secret_key");
        }
        missing
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// S3 endpoint URL (e.g., http://localhost:9000 for MinIO).
    /// Leave empty to use the provider's default endpoint for `region`.
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Path-style addressing (required for MinIO and most S3-compatible stores).
    pub force_path_style: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// First path segment of public delivery URLs (`/{mount}/{identifier}/...`).
    pub mount: String,
    pub default_entrypoint: String,
    /// Inject the client-side router reset script into served HTML.
    pub inject_router_patch: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mount: "play".into(),
            default_entrypoint: DEFAULT_ENTRYPOINT.into(),
            inject_router_patch: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults_only() -> AppConfig {
        with_defaults(config::Config::builder())
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .expect("defaults should deserialize")
    }

    #[test]
    fn test_defaults() {
        let cfg = defaults_only();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.delivery.mount, "play");
        assert_eq!(cfg.delivery.default_entrypoint, "index.html");
        assert!(cfg.delivery.inject_router_patch);
        assert!(cfg.storage.force_path_style);
    }

    #[test]
    fn test_missing_settings_reported() {
        let mut cfg = defaults_only();
        assert_eq!(
            cfg.missing_settings(),
            vec![
                "database.url",
                "storage.bucket",
                "storage.access_key",
                "storage.secret_key"
            ]
        );

        cfg.database.url = "postgres://localhost/arcade".into();
        cfg.storage.bucket = "sites".into();
        cfg.storage.access_key = "key".into();
        cfg.storage.secret_key = "secret".into();
        assert!(cfg.missing_settings().is_empty());
    }
}
