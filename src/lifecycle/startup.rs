//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the configured route table
//! - Assemble templates, users and controllers into an [`Application`]
//!
//! # Design Decisions
//! - Fail fast: a bad route pattern or unreadable template dir is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::app::Application;
use crate::auth::InMemoryUserStore;
use crate::config::AppConfig;
use crate::controllers::{ControllerRegistry, Services};
use crate::routing::{RouteError, RouteTable};
use crate::view::{ViewError, Views};

/// Errors that prevent the application from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Build the application with the built-in controllers.
pub fn bootstrap(config: AppConfig) -> Result<Application, StartupError> {
    bootstrap_with(config, ControllerRegistry::with_defaults())
}

/// Build the application around the given controllers.
pub fn bootstrap_with(
    config: AppConfig,
    controllers: ControllerRegistry,
) -> Result<Application, StartupError> {
    let routes = build_routes(&config)?;

    let mut views = Views::builtin();
    if let Some(dir) = &config.views.dir {
        let loaded = views.load_dir(Path::new(dir))?;
        tracing::info!(dir = %dir, templates = loaded, "Templates loaded");
    }

    let users = InMemoryUserStore::from_config(&config.users);

    tracing::info!(
        routes = routes.len(),
        users = users.len(),
        controllers = ?controllers.names().collect::<Vec<_>>(),
        "Application initialized"
    );

    let services = Services {
        views,
        users: Arc::new(users),
    };
    Ok(Application::new(config, routes, controllers, services))
}

/// Compile `config.routes` in order.
pub fn build_routes(config: &AppConfig) -> Result<RouteTable, RouteError> {
    let mut routes = RouteTable::new();
    for route in &config.routes {
        routes.register(&route.template, route.defaults.clone())?;
    }
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    #[test]
    fn test_bootstrap_defaults() {
        let app = bootstrap(AppConfig::default()).unwrap();
        assert_eq!(app.routes().len(), 3);
        assert!(app.views().contains("Home/index.html"));
    }

    #[test]
    fn test_bad_route_is_fatal() {
        let config = AppConfig {
            routes: vec![RouteConfig::new("<id:(>")],
            ..AppConfig::default()
        };
        assert!(matches!(bootstrap(config), Err(StartupError::Route(_))));
    }

    #[test]
    fn test_missing_views_dir_is_fatal() {
        let mut config = AppConfig::default();
        config.views.dir = Some("/nonexistent/front-controller-views".to_string());
        assert!(matches!(bootstrap(config), Err(StartupError::View(_))));
    }
}
