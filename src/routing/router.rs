//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the first route matching a path
//! - Merge defaults with captures and split selectors from free variables
//! - Return the resolved dispatch or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in registration order (acceptable for typical route counts)
//! - Explicit NoRouteMatch rather than silent default
//! - Handler existence is not checked here

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::routing::casing::{to_camel_case, to_pascal_case};
use crate::routing::pattern::{RouteError, RoutePattern};

/// Named values extracted from a path, plus route defaults.
pub type Variables = BTreeMap<String, String>;

const CONTROLLER: &str = "controller";
const ACTION: &str = "action";

/// No registered route matched the path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matched path '{path}'")]
pub struct NoRouteMatch {
    pub path: String,
}

/// Canonical controller and action identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorGroup {
    /// PascalCase controller name, e.g. `PostAuthors`.
    pub controller: String,
    /// camelCase action name, e.g. `addNew`.
    pub action: String,
}

/// Outcome of a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDispatch {
    pub selector: SelectorGroup,
    pub free_variables: Variables,
}

/// A compiled pattern and the defaults registered with it.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    defaults: Variables,
}

impl RouteEntry {
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn defaults(&self) -> &Variables {
        &self.defaults
    }

    fn resolve(&self, path: &str) -> Option<ResolvedDispatch> {
        let captures = self.pattern.captures(path)?;

        let mut merged = self.defaults.clone();
        for (name, value) in self.pattern.named_values(&captures) {
            merged.insert(name.to_string(), value.to_string());
        }

        let mut resolved = ResolvedDispatch::default();
        for (key, value) in merged {
            match key.as_str() {
                CONTROLLER => resolved.selector.controller = to_pascal_case(&value),
                ACTION => resolved.selector.action = to_camel_case(&value),
                _ => {
                    resolved.free_variables.insert(key, value);
                }
            }
        }
        Some(resolved)
    }
}

/// Ordered route table. First match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `template` and append it with its defaults.
    pub fn register<I, K, V>(&mut self, template: &str, defaults: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pattern = RoutePattern::compile(template)?;
        let defaults: Variables = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for selector in [CONTROLLER, ACTION] {
            let provided = defaults.contains_key(selector)
                || pattern.capture_names().any(|name| name == selector);
            if !provided {
                tracing::warn!(
                    template = %template,
                    missing = selector,
                    "Route never provides a selector field"
                );
            }
        }

        tracing::debug!(
            template = %template,
            regex = %pattern.as_str(),
            position = self.entries.len(),
            "Route registered"
        );
        self.entries.push(RouteEntry { pattern, defaults });
        Ok(())
    }

    /// Resolve `path` against the table.
    pub fn dispatch(&self, path: &str) -> Result<ResolvedDispatch, NoRouteMatch> {
        self.entries
            .iter()
            .find_map(|entry| entry.resolve(path))
            .ok_or_else(|| NoRouteMatch {
                path: path.to_string(),
            })
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
