//! Durable key-value port for session persistence.

use std::collections::HashMap;

/// Storage keys for persisted session fields.
///
/// These are the exact key strings the front-end persists under; changing
/// them invalidates existing sessions.
pub mod keys {
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const USERNAME: &str = "username";
    pub const ROLE: &str = "role";
    pub const SUB_ROLE: &str = "subRole";

    /// Every key the controller owns, in persistence order.
    pub const ALL: [&str; 4] = [IS_AUTHENTICATED, USERNAME, ROLE, SUB_ROLE];
}

/// Durable key-value store port.
///
/// Writes are fire-and-forget from the controller's point of view:
/// implementations swallow their own IO failures (a failed write degrades to
/// "no prior session" on the next start, never to an error surfaced here).
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store, used in tests and as a fallback when no durable backend
/// is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let mut store = MemoryStore::new();
        store.set(keys::USERNAME, "alice");
        assert_eq!(store.get(keys::USERNAME).as_deref(), Some("alice"));

        store.remove(keys::USERNAME);
        assert_eq!(store.get(keys::USERNAME), None);
        assert!(store.is_empty());
    }
}
