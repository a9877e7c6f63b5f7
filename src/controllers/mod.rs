//! Controllers and their registry.
//!
//! # Data Flow
//! ```text
//! ResolvedDispatch (controller, action, free variables)
//!     → ControllerRegistry::resolve (name → factory(variables))
//!     → invoke (has_action → before → perform → after)
//!     → Reply
//! ```
//!
//! # Design Decisions
//! - Controllers are looked up by their PascalCase name, never by reflection
//! - Each request gets a fresh controller built from its free variables
//! - Filters wrap every action uniformly; the router knows nothing of them
//! - Actions are dispatched with a `match` on the camelCase action name

pub mod home;
pub mod login;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::auth::{Session, UserStore};
use crate::error::AppError;
use crate::routing::Variables;
use crate::view::Views;

pub use home::Home;
pub use login::Login;

/// What an action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Html(String),
    Json(serde_json::Value),
    /// 303 redirect to a path on the requesting host.
    Redirect(String),
}

/// Outcome of a `before` filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Continue,
    /// Skip the action and answer with this reply instead.
    Halt(Reply),
}

/// Shared collaborators available to every action.
pub struct Services {
    pub views: Views,
    pub users: Arc<dyn UserStore>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}

/// Per-request data handed to filters and actions.
pub struct ActionContext<'a> {
    pub session: &'a mut Session,
    pub body: &'a [u8],
    pub services: &'a Services,
}

/// A request handler with named actions.
pub trait Controller: Send {
    /// Canonical controller name.
    fn name(&self) -> &'static str;

    fn has_action(&self, action: &str) -> bool;

    /// Run `action`. Only called after `has_action` returned true.
    fn perform(&mut self, action: &str, ctx: &mut ActionContext<'_>) -> Result<Reply, AppError>;

    /// Runs before every action.
    fn before(&mut self, _ctx: &mut ActionContext<'_>) -> Filter {
        Filter::Continue
    }

    /// Runs after every action that succeeded.
    fn after(&mut self, _ctx: &mut ActionContext<'_>, _reply: &mut Reply) {}
}

/// Run an action wrapped in the controller's filters.
pub fn invoke(
    controller: &mut dyn Controller,
    action: &str,
    ctx: &mut ActionContext<'_>,
) -> Result<Reply, AppError> {
    if !controller.has_action(action) {
        return Err(unknown_action(controller.name(), action));
    }

    if let Filter::Halt(reply) = controller.before(ctx) {
        tracing::debug!(controller = controller.name(), action, "Action halted by before filter");
        return Ok(reply);
    }

    let mut reply = controller.perform(action, ctx)?;
    controller.after(ctx, &mut reply);
    Ok(reply)
}

pub(crate) fn unknown_action(controller: &str, action: &str) -> AppError {
    AppError::UnknownAction {
        controller: controller.to_string(),
        action: action.to_string(),
    }
}

/// Builds a controller from the request's free variables.
pub type ControllerFactory = Arc<dyn Fn(Variables) -> Box<dyn Controller> + Send + Sync>;

/// Controller factories keyed by canonical name.
#[derive(Default, Clone)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the application's built-in controllers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Home", |_| Box::new(Home));
        registry.register("Login", |_| Box::new(Login));
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Variables) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Instantiate the controller registered as `name`.
    pub fn resolve(&self, name: &str, variables: Variables) -> Result<Box<dyn Controller>, AppError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AppError::UnknownController(name.to_string()))?;
        Ok(factory(variables))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}
