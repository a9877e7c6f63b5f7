//! The front controller: one raw query in, one reply out.
//!
//! # Data Flow
//! ```text
//! raw query string ("post/123&sort=asc")
//!     → routing::normalize_query ("post/123")
//!     → RouteTable::dispatch (ResolvedDispatch)
//!     → ControllerRegistry::resolve (controller built from free variables)
//!     → controllers::invoke (filters + action)
//!     → Handled { controller, reply }
//! ```

use std::time::Duration;

use crate::auth::{Session, SessionStore};
use crate::config::AppConfig;
use crate::controllers::{invoke, ActionContext, ControllerRegistry, Reply, Services};
use crate::error::AppError;
use crate::routing::{normalize_query, ResolvedDispatch, RouteTable};
use crate::view::Views;

/// A handled request.
#[derive(Debug, Clone, PartialEq)]
pub struct Handled {
    /// Controller that produced the reply.
    pub controller: String,
    pub reply: Reply,
}

/// Everything needed to serve requests. Built once at startup.
#[derive(Debug)]
pub struct Application {
    config: AppConfig,
    routes: RouteTable,
    controllers: ControllerRegistry,
    services: Services,
    sessions: SessionStore,
}

impl Application {
    pub fn new(
        config: AppConfig,
        routes: RouteTable,
        controllers: ControllerRegistry,
        services: Services,
    ) -> Self {
        let sessions = SessionStore::with_ttl(Duration::from_secs(config.session.ttl_secs));
        Self {
            config,
            routes,
            controllers,
            services,
            sessions,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn views(&self) -> &Views {
        &self.services.views
    }

    /// Route a raw front-controller query string and run the matching action.
    pub fn handle(&self, raw_query: &str, body: &[u8], session: &mut Session) -> Result<Handled, AppError> {
        let path = normalize_query(raw_query);
        let ResolvedDispatch {
            selector,
            free_variables,
        } = self.routes.dispatch(path)?;

        tracing::debug!(
            path = %path,
            controller = %selector.controller,
            action = %selector.action,
            variables = ?free_variables,
            "Route matched"
        );

        let mut controller = self.controllers.resolve(&selector.controller, free_variables)?;
        let mut ctx = ActionContext {
            session,
            body,
            services: &self.services,
        };
        let reply = invoke(controller.as_mut(), &selector.action, &mut ctx)?;

        Ok(Handled {
            controller: selector.controller,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::InMemoryUserStore;
    use crate::config::schema::default_routes;

    fn application() -> Application {
        let mut routes = RouteTable::new();
        for route in default_routes() {
            routes.register(&route.template, route.defaults).unwrap();
        }
        Application::new(
            AppConfig::default(),
            routes,
            ControllerRegistry::with_defaults(),
            Services {
                views: Views::builtin(),
                users: Arc::new(InMemoryUserStore::new()),
            },
        )
    }

    #[test]
    fn test_home_page_from_query_only_request() {
        let app = application();
        let mut session = Session::default();

        let handled = app.handle("k1=v1&k2=v2", b"", &mut session).unwrap();
        assert_eq!(handled.controller, "Home");
        assert!(matches!(handled.reply, Reply::Html(_)));
    }

    #[test]
    fn test_catch_all_route() {
        let app = application();
        let mut session = Session::default();

        let handled = app.handle("login/check&x=1", b"", &mut session).unwrap();
        assert_eq!(handled.controller, "Login");
        assert_eq!(
            handled.reply,
            Reply::Json(serde_json::json!({ "isLogin": false }))
        );
    }

    #[test]
    fn test_errors() {
        let app = application();
        let mut session = Session::default();

        assert!(matches!(
            app.handle("a/b/c", b"", &mut session),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            app.handle("post-authors/add-new", b"", &mut session),
            Err(AppError::UnknownController(name)) if name == "PostAuthors"
        ));
        assert!(matches!(
            app.handle("home/add-new", b"", &mut session),
            Err(AppError::UnknownAction { action, .. }) if action == "addNew"
        ));
    }
}
