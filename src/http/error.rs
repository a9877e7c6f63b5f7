//! Error presentation.
//!
//! # Responsibilities
//! - Map application errors to HTTP status codes
//! - Render a detailed page in debug mode, a generic one otherwise
//! - Log every error outside debug mode
//!
//! # Design Decisions
//! - Client errors log at warn, server errors at error
//! - A missing error template never hides the status code

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::Value;

use crate::error::AppError;
use crate::view::{context, Views};

/// Request details shown on debug pages and in logs.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    pub request_id: &'a str,
    pub method: &'a str,
    pub path: &'a str,
}

/// Turns errors into responses.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPresenter<'a> {
    views: &'a Views,
    debug: bool,
}

impl<'a> ErrorPresenter<'a> {
    pub fn new(views: &'a Views, debug: bool) -> Self {
        Self { views, debug }
    }

    pub fn present(&self, err: &AppError, info: RequestInfo<'_>) -> Response {
        let status = err.status_code();
        let code = status.as_u16();
        let ctx = context! {
            code,
            kind => err.kind(),
            message => err.to_string(),
            request_id => info.request_id,
            method => info.method,
            path => info.path,
        };

        let page = if self.debug {
            self.views.render("Error/error.html", &ctx)
        } else {
            self.log(status, &ctx);
            let name = format!("Error/{code}.html");
            if self.views.contains(&name) {
                self.views.render(&name, &ctx)
            } else {
                self.views.render("Error/500.html", &ctx)
            }
        };

        match page {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }

    fn log(&self, status: StatusCode, ctx: &Value) {
        let line = match self.views.render("Error/error.log.template", ctx) {
            Ok(line) => line.trim_end().to_string(),
            Err(_) => ctx.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", line);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", line);
        }
    }
}
