//! Extension-based content-type classification.

/// Fallback for anything we can't classify. Browsers won't try to render it.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess a MIME type from the file extension of `path`.
pub fn classify(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(OCTET_STREAM)
}

/// Media type without parameters (`text/html; charset=utf-8` → `text/html`).
pub fn essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or(content_type).trim()
}

pub fn is_html(content_type: &str) -> bool {
    essence(content_type).eq_ignore_ascii_case("text/html")
}
