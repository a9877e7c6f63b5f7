//! JSON login endpoints.

use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::controllers::{unknown_action, ActionContext, Controller, Reply};
use crate::error::AppError;
use crate::observability::metrics;

/// Body of a login request. `username` is the account's email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Login;

impl Login {
    fn login(&self, ctx: &mut ActionContext<'_>) -> Result<Reply, AppError> {
        let request: LoginRequest = serde_json::from_slice(ctx.body)
            .map_err(|e| AppError::BadRequest(format!("invalid login body: {e}")))?;

        let user = auth::authenticate(ctx.services.users.as_ref(), &request.username, &request.password)?;
        let authenticated = match user {
            Some(user) => {
                auth::login(ctx.session, &user);
                true
            }
            None => {
                tracing::info!(username = %request.username, "Login rejected");
                false
            }
        };
        metrics::record_login(authenticated);

        Ok(Reply::Json(json!({ "authenticated": authenticated })))
    }

    fn check(&self, ctx: &mut ActionContext<'_>) -> Reply {
        Reply::Json(json!({ "isLogin": auth::is_logged_in(ctx.session) }))
    }
}

impl Controller for Login {
    fn name(&self) -> &'static str {
        "Login"
    }

    fn has_action(&self, action: &str) -> bool {
        matches!(action, "login" | "check")
    }

    fn perform(&mut self, action: &str, ctx: &mut ActionContext<'_>) -> Result<Reply, AppError> {
        match action {
            "login" => self.login(ctx),
            "check" => Ok(self.check(ctx)),
            other => Err(unknown_action(self.name(), other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{password, InMemoryUserStore, Session, SessionStore, User};
    use crate::controllers::{invoke, Services};
    use crate::view::Views;

    fn services() -> Services {
        let users = InMemoryUserStore::new();
        users.insert(User {
            id: 1,
            email: "ada@example.com".into(),
            password_hash: password::hash_password("hunter2").unwrap(),
        });
        Services {
            views: Views::builtin(),
            users: Arc::new(users),
        }
    }

    fn run(action: &str, body: &[u8], session: &mut Session, services: &Services) -> Result<Reply, AppError> {
        let mut ctx = ActionContext {
            session,
            body,
            services,
        };
        invoke(&mut Login, action, &mut ctx)
    }

    #[test]
    fn test_login_success_then_check() {
        let services = services();
        let store = SessionStore::new();
        let mut session = Session::load(&store, None);

        let body = br#"{"username":"ada@example.com","password":"hunter2"}"#;
        let reply = run("login", body, &mut session, &services).unwrap();
        assert_eq!(reply, Reply::Json(json!({ "authenticated": true })));

        let reply = run("check", b"", &mut session, &services).unwrap();
        assert_eq!(reply, Reply::Json(json!({ "isLogin": true })));
    }

    #[test]
    fn test_login_wrong_password() {
        let services = services();
        let mut session = Session::load(&SessionStore::new(), None);

        let body = br#"{"username":"ada@example.com","password":"nope"}"#;
        let reply = run("login", body, &mut session, &services).unwrap();
        assert_eq!(reply, Reply::Json(json!({ "authenticated": false })));
        assert!(!auth::is_logged_in(&session));
    }

    #[test]
    fn test_login_bad_body() {
        let services = services();
        let mut session = Session::load(&SessionStore::new(), None);

        let err = run("login", b"not json", &mut session, &services).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
