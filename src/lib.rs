//! URL front controller.
//!
//! Every request is funneled through one entry point, matched against an
//! ordered table of URL patterns, and dispatched to a controller action.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (fallback handler, middleware)
//!                          │  rewrite_uri: "/post/123?sort=asc" → "post/123&sort=asc"
//!                          ▼
//!                     app::Application::handle
//!                          │
//!                          ├─▶ routing (normalize → first match → selector + free variables)
//!                          ├─▶ controllers (registry → before → action → after)
//!                          │        └─▶ auth (sessions, users), view (templates)
//!                          ▼
//!     Client Response ◀── http::response / http::error
//!
//!     Cross-cutting: config, observability (tracing, metrics), lifecycle
//! ```

// Core subsystems
pub mod app;
pub mod config;
pub mod controllers;
pub mod http;
pub mod routing;

// Supporting services
pub mod auth;
pub mod error;
pub mod view;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use app::Application;
pub use config::AppConfig;
pub use error::AppError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ResolvedDispatch, RouteTable};
