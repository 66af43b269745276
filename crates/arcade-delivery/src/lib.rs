//! # arcade-delivery
//!
//! Serves published games. Given a request naming a project (by slug, id, or
//! custom domain) and a file path, resolves which immutable build to serve,
//! finds the file in object storage, and composes a response with the right
//! content type, caching, and embedding headers.

pub mod content_type;
pub mod fetcher;
pub mod manifest;
pub mod path;
pub mod resolver;
pub mod response;
pub mod routes;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

use std::any::Any;
use std::sync::Arc;

use arcade_common::error::{DeliveryError, DeliveryResult};
use axum::{Router, response::Response};

use crate::service::DeliveryService;
use crate::store::ProjectStore;

/// Delivery backends, or the reason they could not be built.
#[derive(Clone)]
pub enum Backend {
    Ready {
        service: Arc<DeliveryService>,
        /// Kept for health checks.
        store: Arc<dyn ProjectStore>,
    },
    Unconfigured {
        missing: Vec<String>,
    },
}

impl Backend {
    pub fn service(&self) -> DeliveryResult<&DeliveryService> {
        match self {
            Self::Ready { service, .. } => Ok(service.as_ref()),
            Self::Unconfigured { missing } => Err(DeliveryError::Configuration {
                missing: missing.clone(),
            }),
        }
    }
}

/// Shared application state available to all route handlers.
pub struct AppState {
    pub backend: Backend,
}

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::site::router())
        .layer(tower_http::catch_panic::CatchPanicLayer::custom(panic_response))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(Arc::new(state))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    routes::site::error_response(DeliveryError::Internal(anyhow::anyhow!(
        "handler panicked: {detail}"
    )))
}
