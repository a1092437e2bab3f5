//! Minimal HTTP response model.
//!
//! This struct represents an HTTP response as handed over by a
//! [`Transport`](crate::net::Transport). It contains the final URL (after
//! redirects, if the client follows them), status code + reason, response
//! headers, and the body, which may still be streaming.
//!
//! ## Notes
//! - `status` is a plain public field. Changing it changes which declared
//!   outcome a later resolution picks.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names.
//! - `status_text` is derived from the status code's canonical reason phrase
//!   and is `"Unknown"` for non-standard codes.
use crate::net::Body;
use http::header::CONTENT_TYPE;
use http::HeaderMap;

#[derive(Debug)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: url::Url,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Response body, buffered or streaming.
    pub body: Body,
}

impl Response {
    /// Builds a response and tags the body with the `Content-Type` header.
    pub fn new(url: url::Url, status: u16, headers: HeaderMap, body: Body) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            url,
            status,
            status_text: reason_phrase(status).to_string(),
            headers,
            body: body.with_content_type(content_type),
        }
    }
}

pub(crate) fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}
