use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{AuthIdentity, Session};

pub const DEFAULT_MAX_GUEST_SESSIONS: usize = 1000;

/// Bearer sessions issued by this server, keyed by token.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    max_guests: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_guests: DEFAULT_MAX_GUEST_SESSIONS,
        }
    }

    /// Caps live guest sessions; opening one more evicts the oldest guest.
    pub fn with_guest_limit(mut self, max_guests: usize) -> Self {
        self.max_guests = max_guests.max(1);
        self
    }

    pub async fn open(&self, user: Option<AuthIdentity>) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            is_guest: user.is_none(),
            user,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut sessions = self.sessions.write().await;
        if session.is_guest {
            self.make_room_for_guest(&mut sessions, now);
        }
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    fn make_room_for_guest(&self, sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) {
        let guests = sessions.values().filter(|s| s.is_guest).count();
        if guests < self.max_guests {
            return;
        }

        sessions.retain(|_, s| s.expires_at > now);
        let mut guests: Vec<(DateTime<Utc>, String)> = sessions
            .values()
            .filter(|s| s.is_guest)
            .map(|s| (s.expires_at, s.token.clone()))
            .collect();
        if guests.len() < self.max_guests {
            return;
        }

        guests.sort();
        let excess = guests.len() + 1 - self.max_guests;
        for (_, token) in guests.into_iter().take(excess) {
            sessions.remove(&token);
        }
        debug!("evicted {} guest sessions", excess);
    }

    /// The live session for `token`; expired sessions are not returned.
    pub async fn get(&self, token: &str) -> Option<Session> {
        self.get_at(token, Utc::now()).await
    }

    async fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(token)
            .filter(|s| s.expires_at > now)
            .cloned()
    }

    pub async fn close(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drops every session expired at `now`, returning how many went.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
