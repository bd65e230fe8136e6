//! Session store
//!
//! Sessions are created lazily on first lookup. The map is guarded by an
//! async `RwLock` and each session by its own lock, so handlers for different
//! clients only contend while a new session is being inserted.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::Session;

/// A session shared between every connection from one address.
pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<IpAddr, SharedSession>>>,
    token_name: Arc<str>,
}

impl SessionStore {
    /// `token_name` is the object key each new session's validation token goes under.
    pub fn new(token_name: impl Into<String>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            token_name: Arc::from(token_name.into()),
        }
    }

    pub fn token_name(&self) -> &str {
        &self.token_name
    }

    /// Returns the session for `addr`, creating it on first sight.
    ///
    /// Does not touch the last-connection time of an existing session.
    pub async fn get_session(&self, addr: IpAddr) -> SharedSession {
        if let Some(session) = self.sessions.read().await.get(&addr) {
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(addr)
            .or_insert_with(|| {
                tracing::debug!(client = %addr, "creating session");
                Arc::new(RwLock::new(Session::new(self.token_name.clone())))
            })
            .clone()
    }

    pub async fn contains(&self, addr: IpAddr) -> bool {
        self.sessions.read().await.contains_key(&addr)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session idle for longer than `threshold_secs`.
    ///
    /// Returns how many were removed.
    pub async fn sweep_expired(&self, threshold_secs: u64) -> usize {
        let snapshot: Vec<(IpAddr, SharedSession)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(addr, s)| (*addr, s.clone()))
            .collect();

        let mut expired = Vec::new();
        for (addr, session) in snapshot {
            if session.read().await.is_expired(threshold_secs) {
                expired.push(addr);
            }
        }

        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let mut removed = 0;
        for addr in expired {
            // Re-check under the write lock: the client may have come back.
            let still_expired = match sessions.get(&addr) {
                Some(session) => session.read().await.is_expired(threshold_secs),
                None => false,
            };
            if still_expired {
                sessions.remove(&addr);
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "swept expired sessions");
        }
        removed
    }
}
