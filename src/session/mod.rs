//! Per-client session tracking
//!
//! Sessions are keyed by the client's IP address only, so every connection
//! from one address shares a session whatever its source port.

pub mod store;

pub use store::{SessionStore, SharedSession};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State kept for one client address.
#[derive(Debug, Clone)]
pub struct Session {
    last_connection: Instant,
    authenticated: bool,
    objects: HashMap<String, Value>,
    /// Object key the validation token lives under
    token_name: Arc<str>,
}

impl Session {
    /// Only [`SessionStore`] creates sessions.
    pub(crate) fn new(token_name: Arc<str>) -> Self {
        let mut objects = HashMap::new();
        objects.insert(
            token_name.to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );

        Self {
            last_connection: Instant::now(),
            authenticated: false,
            objects,
            token_name,
        }
    }

    pub fn last_connection(&self) -> Instant {
        self.last_connection
    }

    pub fn update_last_connection_time(&mut self) {
        self.last_connection = Instant::now();
    }

    /// True once more than `threshold_secs` have passed since the last connection.
    pub fn is_expired(&self, threshold_secs: u64) -> bool {
        self.is_expired_at(threshold_secs, Instant::now())
    }

    /// [`is_expired`](Self::is_expired) evaluated at `now`.
    pub fn is_expired_at(&self, threshold_secs: u64, now: Instant) -> bool {
        now.saturating_duration_since(self.last_connection) > Duration::from_secs(threshold_secs)
    }

    /// De-authorizes the session. The session itself stays in the store.
    pub fn expire(&mut self) {
        self.authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    /// Current validation token, read from the object bag.
    ///
    /// `None` if the entry was replaced with a non-string value.
    pub fn token(&self) -> Option<&str> {
        self.objects.get(&*self.token_name).and_then(Value::as_str)
    }

    /// True when `sent` matches the current validation token.
    pub fn validate_token(&self, sent: Option<&str>) -> bool {
        matches!((sent, self.token()), (Some(sent), Some(token)) if sent == token)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.objects.get(key)
    }

    pub fn set_object(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.objects.insert(key.into(), value.into());
    }

    /// Stored value converted to `T`, or `T::default()` when the key is
    /// missing or the value does not convert.
    ///
    /// Flags read this way should therefore use `true` for their "yes" state.
    pub fn get_object<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.objects
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_stores_token_under_name() {
        let session = Session::new(Arc::from("__CSRFToken__"));
        let stored = session.get_object::<String>("__CSRFToken__");
        assert_eq!(session.token(), Some(stored.as_str()));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn tokens_differ_between_sessions() {
        assert_ne!(
            Session::new(Arc::from("t")).token(),
            Session::new(Arc::from("t")).token()
        );
    }

    #[test]
    fn rewriting_the_token_key_changes_the_token() {
        let mut session = Session::new(Arc::from("t"));
        let original = session.token().map(str::to_string);

        session.set_object("t", "rotated");

        assert_eq!(session.token(), Some("rotated"));
        assert!(session.validate_token(Some("rotated")));
        assert!(!session.validate_token(original.as_deref()));
    }

    #[test]
    fn non_string_token_never_validates() {
        let mut session = Session::new(Arc::from("t"));
        session.set_object("t", 7);

        assert_eq!(session.token(), None);
        assert!(!session.validate_token(None));
        assert!(!session.validate_token(Some("7")));
    }
}
