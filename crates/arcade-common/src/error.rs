//! Centralized error types for Arcade delivery.
//!
//! Uses `thiserror` for ergonomic error definitions and provides HTTP-friendly
//! error variants that can be directly converted to responses.

use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

/// Branded page returned when the requested project cannot be resolved.
pub const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Game not found</title>
<style>
  body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
         background: #0f0f17; color: #e8e8f0; font-family: system-ui, sans-serif; text-align: center; }
  h1 { font-size: 2.5rem; margin: 0 0 .5rem; }
  p { color: #9a9ab0; }
</style>
</head>
<body>
<main>
  <h1>404</h1>
  <p>This game doesn't exist or hasn't been published yet.</p>
</main>
</body>
</html>
"#;

/// Core error type for the delivery path.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    // === Request errors ===
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    // === Resolution errors ===
    #[error("Project not found")]
    ProjectNotFound,

    #[error("File not found")]
    FileNotFound,

    // === Deployment errors ===
    #[error("Missing configuration: {}", .missing.join(", "))]
    Configuration { missing: Vec<String> },

    // === Infrastructure errors ===
    #[error("Storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DeliveryError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ProjectNotFound | Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::Configuration { .. }
            | Self::Storage(_)
            | Self::Database(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for logs and programmatic handling.
    pub fn error_code(&self) -> &str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for DeliveryError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            DeliveryError::ProjectNotFound => {
                return (
                    status,
                    [(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")],
                    Html(NOT_FOUND_PAGE),
                )
                    .into_response();
            }
            DeliveryError::FileNotFound => return (status, "Not found").into_response(),
            DeliveryError::BadRequest { message } => return (status, message).into_response(),
            // Don't leak internal details to clients
            DeliveryError::Configuration { missing } => {
                tracing::error!(?missing, "Delivery backends are not configured");
            }
            DeliveryError::Storage(e) => tracing::error!("Storage error: {e:#}"),
            DeliveryError::Database(e) => tracing::error!("Database error: {e}"),
            DeliveryError::Internal(e) => tracing::error!("Internal error: {e:#}"),
        }

        (status, "An internal error occurred").into_response()
    }
}

/// Convenience type alias for Results using DeliveryError.
pub type DeliveryResult<T> = Result<T, DeliveryError>;
