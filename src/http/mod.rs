//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, fallback handler)
//!     → request.rs (request ID, host, session cookie)
//!     → app::Application::handle (route + controller)
//!     → response.rs (reply → response, Set-Cookie)
//!       or error.rs (error → status + page)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ErrorPresenter, RequestInfo};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
