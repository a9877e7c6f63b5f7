//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! application. All types derive Serde traits for deserialization from
//! config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Show detailed error pages instead of generic ones.
    pub debug: bool,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Template settings.
    pub views: ViewsConfig,

    /// Route table, in registration order.
    pub routes: Vec<RouteConfig>,

    /// Known users.
    pub users: Vec<UserConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            session: SessionConfig::default(),
            observability: ObservabilityConfig::default(),
            views: ViewsConfig::default(),
            routes: default_routes(),
            users: Vec::new(),
        }
    }
}

/// The front controller's stock table: home page, login, then the
/// `<controller>/<action>` catch-all.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("").with_default("controller", "Home").with_default("action", "index"),
        RouteConfig::new("login")
            .with_default("controller", "Login")
            .with_default("action", "login"),
        RouteConfig::new("<controller>/<action>"),
    ]
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,

    /// Add the `Secure` attribute to the cookie.
    pub secure: bool,

    /// Seconds a session may sit idle before it is discarded.
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "SESSID".to_string(),
            secure: false,
            ttl_secs: 1440,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Template configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Directory whose files override the built-in templates.
    pub dir: Option<String>,
}

/// One route table entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route template, e.g. `<controller>/<id:\d+>`.
    pub template: String,

    /// Parameters not present in the path.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

impl RouteConfig {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            defaults: BTreeMap::new(),
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }
}

/// A user account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    pub id: u64,
    pub email: String,

    /// Argon2 PHC string.
    pub password_hash: String,
}
