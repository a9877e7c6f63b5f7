//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every route template so broken patterns stop startup
//! - Validate value ranges and user records
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::auth::password;
use crate::config::schema::AppConfig;
use crate::routing::RoutePattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route #{index} '{template}' does not compile: {reason}")]
    InvalidRoute {
        index: usize,
        template: String,
        reason: String,
    },

    #[error("session.cookie_name must not be empty")]
    EmptyCookieName,

    #[error("session.ttl_secs must be greater than zero")]
    ZeroSessionTtl,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("duplicate user email '{0}'")]
    DuplicateEmail(String),

    #[error("duplicate user id {0}")]
    DuplicateUserId(u64),

    #[error("user '{email}' has an invalid password hash: {reason}")]
    InvalidPasswordHash { email: String, reason: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(e) = RoutePattern::compile(&route.template) {
            errors.push(ValidationError::InvalidRoute {
                index,
                template: route.template.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }
    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::ZeroSessionTtl);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut emails = HashSet::new();
    let mut ids = HashSet::new();
    for user in &config.users {
        if !emails.insert(user.email.to_lowercase()) {
            errors.push(ValidationError::DuplicateEmail(user.email.clone()));
        }
        if !ids.insert(user.id) {
            errors.push(ValidationError::DuplicateUserId(user.id));
        }
        if let Err(e) = password::check_hash(&user.password_hash) {
            errors.push(ValidationError::InvalidPasswordHash {
                email: user.email.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RouteConfig, UserConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.routes.push(RouteConfig::new(r"<id:\d+(>"));
        config.session.cookie_name = " ".into();
        config.session.ttl_secs = 0;
        config.timeouts.request_secs = 0;
        config.users = vec![
            UserConfig {
                id: 1,
                email: "a@b.c".into(),
                password_hash: "plain".into(),
            },
            UserConfig {
                id: 1,
                email: "A@B.C".into(),
                password_hash: password::hash_password("pw").unwrap(),
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidRoute { index: 3, .. }
        ));
        assert!(errors.contains(&ValidationError::EmptyCookieName));
        assert!(errors.contains(&ValidationError::ZeroSessionTtl));
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::DuplicateEmail("A@B.C".into())));
        assert!(errors.contains(&ValidationError::DuplicateUserId(1)));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidPasswordHash { email, .. } if email == "a@b.c")));
        assert_eq!(errors.len(), 7);
    }
}
