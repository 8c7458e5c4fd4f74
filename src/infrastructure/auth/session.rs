use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::entities::user::SessionUser;

#[derive(Debug, Clone)]
struct Session {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// In-process session store keyed by an opaque id carried in the session
/// cookie. Entries expire after the configured TTL; expired entries are
/// dropped lazily on access and swept by the maintenance task.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Creates a session for the user and returns its opaque id.
    pub fn insert(&self, user: SessionUser) -> String {
        let id = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let session = Session {
            user,
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.insert(id.clone(), session);
        id
    }

    pub fn get(&self, id: &str) -> Option<SessionUser> {
        let expired = match self.sessions.get(id) {
            Some(session) if session.expires_at > Utc::now() => {
                return Some(session.user.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(id);
        }
        None
    }

    /// Removes a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops all expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before - self.sessions.len()
    }
}
