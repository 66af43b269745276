//! Response composition: content type, caching, and embedding headers.
//!
//! Published games are shown inside an iframe on the platform, so responses
//! never carry `X-Frame-Options`.

use arcade_common::models::Manifest;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::borrow::Cow;

use crate::content_type;

pub const CACHE_HTML: &str = "no-cache, no-store, must-revalidate";
pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const CROSS_ORIGIN_RESOURCE_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-resource-policy");

/// Marker attribute that makes the router patch idempotent.
const ROUTER_PATCH_MARKER: &str = "data-arcade-router-reset";

/// Resets client-side routers that assume they are mounted at `/`.
const ROUTER_PATCH: &str = concat!(
    "<script data-arcade-router-reset>",
    "(function(){try{",
    "if(location.pathname!=='/'&&!location.hash){",
    "history.replaceState(null,'','/');",
    "window.dispatchEvent(new PopStateEvent('popstate',{state:null}));",
    "}}catch(e){}})();",
    "</script>"
);

/// Content type for `path`: manifest declaration first, then the extension.
pub fn content_type_for<'a>(path: &str, manifest: Option<&'a Manifest>) -> &'a str {
    manifest
        .and_then(|m| m.content_type(path))
        .unwrap_or_else(|| content_type::classify(path))
}

pub fn cache_control_for(content_type: &str) -> &'static str {
    if content_type::is_html(content_type) {
        CACHE_HTML
    } else {
        CACHE_IMMUTABLE
    }
}

/// CORS and content-sniffing headers carried by every delivery response.
pub fn apply_delivery_headers(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        CROSS_ORIGIN_RESOURCE_POLICY,
        HeaderValue::from_static("cross-origin"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.remove(header::X_FRAME_OPTIONS);
}

/// Insert the router patch right after the first `<head>`.
///
/// Documents without `<head>` or already patched are returned unchanged.
pub fn inject_router_patch(html: &str) -> Cow<'_, str> {
    if html.contains(ROUTER_PATCH_MARKER) || !html.contains("<head>") {
        return Cow::Borrowed(html);
    }
    Cow::Owned(html.replacen("<head>", &format!("<head>{ROUTER_PATCH}"), 1))
}

/// Response to a CORS preflight.
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_delivery_headers(response.headers_mut());
    response
}

#[derive(Debug, Clone)]
pub struct ResponseComposer {
    inject_router_patch: bool,
}

impl ResponseComposer {
    pub fn new(inject_router_patch: bool) -> Self {
        Self { inject_router_patch }
    }

    /// Build the `200` response for a fetched file.
    pub fn compose(&self, served_path: &str, bytes: Bytes, manifest: Option<&Manifest>) -> Response {
        let content_type = content_type_for(served_path, manifest);
        let html = content_type::is_html(content_type);

        // Non-UTF-8 HTML is served as stored.
        let patched = if html && self.inject_router_patch {
            std::str::from_utf8(&bytes)
                .ok()
                .and_then(|text| match inject_router_patch(text) {
                    Cow::Owned(patched) => Some(patched),
                    Cow::Borrowed(_) => None,
                })
        } else {
            None
        };
        let body = patched.map(Bytes::from).unwrap_or(bytes);

        let mut response = Response::new(Body::from(body));
        let headers = response.headers_mut();
        match HeaderValue::from_str(content_type) {
            Ok(value) => headers.insert(header::CONTENT_TYPE, value),
            Err(_) => headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type::OCTET_STREAM),
            ),
        };
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control_for(content_type)),
        );
        apply_delivery_headers(headers);
        response
    }
}
