//! Response construction.
//!
//! # Responsibilities
//! - Turn controller replies into HTTP responses
//! - Attach the session cookie when the session id changed
//!
//! # Design Decisions
//! - Redirects are 303 See Other to an absolute URL on the request's host

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::config::schema::SessionConfig;
use crate::controllers::Reply;

/// Convert a reply, resolving redirects against `host`.
pub fn reply_response(reply: Reply, host: Option<&str>) -> Response {
    match reply {
        Reply::Html(body) => Html(body).into_response(),
        Reply::Json(value) => Json(value).into_response(),
        Reply::Redirect(url) => {
            let location = match host {
                Some(host) => format!("http://{host}{url}"),
                None => url,
            };
            (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
        }
    }
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(config: &SessionConfig, id: Uuid) -> Option<HeaderValue> {
    let cookie = Cookie::build((config.cookie_name.clone(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .build();

    match HeaderValue::from_str(&cookie.encoded().to_string()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Session cookie is not a valid header value");
            None
        }
    }
}
