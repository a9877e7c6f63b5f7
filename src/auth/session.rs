//! Server-side sessions.
//!
//! # Responsibilities
//! - Keep session data keyed by an opaque id carried in a cookie
//! - Hand each request its own `Session` value
//! - Persist changes and report which cookie to send back
//!
//! # Design Decisions
//! - A session is only stored once something is written to it
//! - Regenerating the id drops the old entry on commit
//! - Unknown, malformed or expired cookie ids start a fresh session
//! - Expiry is measured from the last request that used the session

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

/// Idle lifetime used when none is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(1440);

/// Values stored for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone)]
struct Entry {
    data: SessionData,
    last_seen: Instant,
}

impl Entry {
    fn expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() >= ttl
    }
}

/// Shared session storage. Entries idle for longer than the ttl are dropped:
/// lazily when looked up, and in a sweep on every write.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<DashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live session and mark it as seen.
    pub fn get(&self, id: &Uuid) -> Option<SessionData> {
        if self
            .inner
            .remove_if(id, |_, entry| entry.expired(self.ttl))
            .is_some()
        {
            tracing::debug!(session = %id, "Session expired");
            return None;
        }

        let mut entry = self.inner.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.data.clone())
    }

    pub fn put(&self, id: Uuid, data: SessionData) {
        self.inner.insert(
            id,
            Entry {
                data,
                last_seen: Instant::now(),
            },
        );
        self.purge_expired();
    }

    pub fn remove(&self, id: &Uuid) {
        self.inner.remove(id);
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, entry| !entry.expired(self.ttl));
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            tracing::debug!(removed, "Expired sessions purged");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Session state for a single request.
#[derive(Debug, Default)]
pub struct Session {
    id: Option<Uuid>,
    loaded: Option<Uuid>,
    data: SessionData,
    dirty: bool,
}

impl Session {
    /// Load the session named by the request cookie, if it exists.
    pub fn load(store: &SessionStore, cookie: Option<&str>) -> Self {
        let found = cookie
            .and_then(|c| Uuid::parse_str(c).ok())
            .and_then(|id| store.get(&id).map(|data| (id, data)));

        match found {
            Some((id, data)) => Self {
                id: Some(id),
                loaded: Some(id),
                data,
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn user_id(&self) -> Option<u64> {
        self.data.user_id
    }

    pub fn set_user_id(&mut self, user_id: u64) {
        self.data.user_id = Some(user_id);
        self.dirty = true;
    }

    /// Issue a new id for this session; the old one stops working.
    pub fn regenerate(&mut self) {
        self.id = Some(Uuid::new_v4());
        self.dirty = true;
    }

    /// Persist changes. Returns the id to send as a cookie when it changed.
    pub fn commit(self, store: &SessionStore) -> Option<Uuid> {
        if let Some(old) = self.loaded.filter(|old| Some(*old) != self.id) {
            store.remove(&old);
        }
        if !self.dirty {
            return None;
        }

        let id = self.id.unwrap_or_else(Uuid::new_v4);
        store.put(id, self.data);

        (Some(id) != self.loaded).then_some(id)
    }
}
