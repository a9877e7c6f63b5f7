//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single fallback handler
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Rewrite each request (decoded path + raw query) into a front-controller
//!   query string
//! - Run the application off the async runtime and convert its result
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, Request},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::app::{Application, Handled};
use crate::auth::Session;
use crate::config::AppConfig;
use crate::controllers::ControllerRegistry;
use crate::error::AppError;
use crate::http::error::{ErrorPresenter, RequestInfo};
use crate::http::request::{self, propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::{reply_response, session_cookie};
use crate::lifecycle::signals::shutdown_signal;
use crate::lifecycle::startup::{bootstrap, bootstrap_with, StartupError};
use crate::observability::metrics;
use crate::routing::query::{decode_path, rewrite_uri};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

/// HTTP server for the front controller.
pub struct HttpServer {
    router: Router,
    app: Arc<Application>,
}

impl HttpServer {
    /// Create a server with the built-in controllers.
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        Ok(Self::from_application(Arc::new(bootstrap(config)?)))
    }

    /// Create a server with a custom controller registry.
    pub fn with_controllers(
        config: AppConfig,
        controllers: ControllerRegistry,
    ) -> Result<Self, StartupError> {
        Ok(Self::from_application(Arc::new(bootstrap_with(
            config,
            controllers,
        )?)))
    }

    pub fn from_application(app: Arc<Application>) -> Self {
        let router = Self::build_router(AppState { app: app.clone() });
        Self { router, app }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.app.config();
        let timeout = Duration::from_secs(config.timeouts.request_secs);
        let body_limit = config.limits.max_body_bytes;

        Router::new()
            .fallback(front_controller)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(body_limit))
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// The router, for serving through something other than [`HttpServer::run`].
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives, either from the OS or
    /// through `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.app.routes().len(),
            debug = self.app.config().debug,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn application(&self) -> &Arc<Application> {
        &self.app
    }
}

/// Every request lands here regardless of method or path.
async fn front_controller(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let app = state.app;

    let request_id = request.request_id().unwrap_or("unknown").to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let raw_query = rewrite_uri(&decode_path(&path), request.uri().query());
    let host = request::host(request.headers()).map(str::to_string);
    let cookie = request::cookie(request.headers(), &app.config().session.cookie_name);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = %raw_query,
        "Dispatching request"
    );

    let limit = app.config().limits.max_body_bytes;
    let (result, new_session) = match to_bytes(request.into_body(), limit).await {
        Ok(body) => {
            let worker = app.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                let mut session = Session::load(worker.sessions(), cookie.as_deref());
                let result = worker.handle(&raw_query, &body, &mut session);
                (result, session.commit(worker.sessions()))
            })
            .await;

            match outcome {
                Ok(outcome) => outcome,
                Err(e) => (Err(AppError::Internal(e.to_string())), None),
            }
        }
        Err(e) => (
            Err(AppError::BadRequest(format!("unreadable request body: {e}"))),
            None,
        ),
    };

    let (mut response, controller) = match result {
        Ok(Handled { controller, reply }) => (reply_response(reply, host.as_deref()), controller),
        Err(err) => {
            if matches!(err, AppError::NotFound(_)) {
                metrics::record_route_miss();
            }
            let info = RequestInfo {
                request_id: &request_id,
                method: &method,
                path: &path,
            };
            let presenter = ErrorPresenter::new(app.views(), app.config().debug);
            (presenter.present(&err, info), "none".to_string())
        }
    };

    if let Some(value) = new_session.and_then(|id| session_cookie(&app.config().session, id)) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }

    metrics::record_request(&method, response.status().as_u16(), &controller, start);
    response
}
