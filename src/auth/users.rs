//! User records and lookup.

use dashmap::DashMap;

use crate::config::UserConfig;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
}

/// Lookup of users by email address.
pub trait UserStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<User>;
}

/// Users held in memory, keyed by lower-cased email.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    by_email: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the `[[users]]` config section.
    pub fn from_config(users: &[UserConfig]) -> Self {
        let store = Self::new();
        for u in users {
            store.insert(User {
                id: u.id,
                email: u.email.clone(),
                password_hash: u.password_hash.clone(),
            });
        }
        tracing::info!(count = store.len(), "User store loaded");
        store
    }

    pub fn insert(&self, user: User) {
        self.by_email.insert(user.email.to_lowercase(), user);
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_email(&self, email: &str) -> Option<User> {
        self.by_email
            .get(&email.to_lowercase())
            .map(|r| r.value().clone())
    }
}
