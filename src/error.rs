//! Application error type and its HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

use crate::auth::PasswordError;
use crate::routing::NoRouteMatch;
use crate::view::ViewError;

/// Errors raised while handling a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// No route matched the request path.
    #[error(transparent)]
    NotFound(#[from] NoRouteMatch),

    /// A route matched but names a controller nobody registered.
    #[error("controller '{0}' not found")]
    UnknownController(String),

    /// The controller exists but has no such action.
    #[error("action '{action}' not found in controller '{controller}'")]
    UnknownAction { controller: String, action: String },

    /// The request body could not be used.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error. Only a missing route is a 404; everything
    /// else that is not the client's fault is a 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownController(_)
            | AppError::UnknownAction { .. }
            | AppError::Password(_)
            | AppError::View(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short name of the error kind, shown on debug pages and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NoRouteMatch",
            AppError::UnknownController(_) => "UnknownController",
            AppError::UnknownAction { .. } => "UnknownAction",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Password(_) => "PasswordError",
            AppError::View(_) => "ViewError",
            AppError::Internal(_) => "Internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::from(NoRouteMatch {
            path: "a/b/c".into(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "no route matched path 'a/b/c'");

        let unknown = AppError::UnknownController("Nope".into());
        assert_eq!(unknown.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad = AppError::BadRequest("not json".into());
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::UnknownAction {
            controller: "Home".into(),
            action: "missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "action 'missing' not found in controller 'Home'"
        );
        assert_eq!(err.kind(), "UnknownAction");
    }
}
