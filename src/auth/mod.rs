//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Login request (email, password)
//!     → users.rs (lookup by email)
//!     → password.rs (Argon2 verification)
//!     → session.rs (regenerate id, store user id)
//!
//! Later requests
//!     → session cookie → Session::load → is_logged_in
//! ```

pub mod password;
pub mod session;
pub mod users;

pub use password::PasswordError;
pub use session::{Session, SessionStore, DEFAULT_SESSION_TTL};
pub use users::{InMemoryUserStore, User, UserStore};

/// Look up a user by email and check the password.
///
/// Returns `Ok(None)` for an unknown email or a wrong password.
pub fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<Option<User>, PasswordError> {
    let Some(user) = store.find_by_email(email) else {
        return Ok(None);
    };

    if password::verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Log the user in on this session, issuing a fresh session id.
pub fn login(session: &mut Session, user: &User) {
    session.regenerate();
    session.set_user_id(user.id);
    tracing::info!(user_id = user.id, "User logged in");
}

pub fn is_logged_in(session: &Session) -> bool {
    session.user_id().is_some()
}
