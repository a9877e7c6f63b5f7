//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Read routing-relevant pieces of the request (host, session cookie)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Cookies are parsed (and percent-decoded) by the cookie jar

use axum::http::{header, HeaderMap, Request};
use axum_extra::extract::cookie::CookieJar;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns a request ID when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Access to the request ID header.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}

/// The `Host` header, if present and readable.
pub fn host(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::HOST).and_then(|h| h.to_str().ok())
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|c| c.value().to_string())
}
