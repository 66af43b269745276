//! Public delivery of published games.
//!
//! GET  /{mount}/{identifier}[/{*file}]  entrypoint, or a file, of a project by slug or id
//! GET  /  and  /{*path}                 any path on a host with a custom-domain mapping
//! OPTIONS on any of the above           CORS preflight
//!
//! Both shapes share one catch-all route: a mapped host owns its whole path
//! space, so the mount prefix can only be split off after the host lookup.

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use arcade_common::error::{DeliveryError, DeliveryResult};
use std::sync::Arc;

use crate::{
    AppState,
    response::{apply_delivery_headers, preflight},
    service::DeliveryRequest,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(serve_root).options(options))
        .route("/{*path}", get(serve_path).options(options))
}

async fn options() -> Response {
    preflight()
}

async fn serve_root(State(state): State<Arc<AppState>>, headers: HeaderMap, uri: Uri) -> Response {
    let host = request_host(&headers, &uri);
    deliver(&state, host.as_deref(), None).await
}

async fn serve_path(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let host = request_host(&headers, &uri);
    deliver(&state, host.as_deref(), Some(&path)).await
}

async fn deliver(state: &AppState, host: Option<&str>, path: Option<&str>) -> Response {
    match try_deliver(state, host, path).await {
        Ok(response) => response,
        Err(e) => error_response(e),
    }
}

async fn try_deliver(
    state: &AppState,
    host: Option<&str>,
    path: Option<&str>,
) -> DeliveryResult<Response> {
    state
        .backend
        .service()?
        .deliver(DeliveryRequest { host, path })
        .await
}

/// Error response carrying the same CORS headers as a successful one.
pub fn error_response(err: DeliveryError) -> Response {
    tracing::debug!(code = err.error_code(), "Delivery failed");
    let mut response = err.into_response();
    apply_delivery_headers(response.headers_mut());
    response
}

fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host())
        .map(str::to_string)
}
