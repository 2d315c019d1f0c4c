/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Session storage seam.
//!
//! The flow controller only needs to store and read string values under
//! string keys; whatever the hosting framework uses for sessions (cookies,
//! a database row, redis) adapts behind [`SessionStore`]. The bundled
//! [`MemorySessionStore`] covers embedding without a framework and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key-value storage scoped to the hosting application's sessions.
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str);

    /// Read and remove the value under `key` in one step.
    ///
    /// CSRF state is single-use; taking it atomically is what prevents a
    /// replayed callback from seeing the same value twice.
    fn take(&self, key: &str) -> Option<String>;

    /// Remove the value under `key`, if any.
    fn remove(&self, key: &str);
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn put(&self, key: &str, value: &str) {
        (**self).put(key, value)
    }

    fn take(&self, key: &str) -> Option<String> {
        (**self).take(key)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory [`SessionStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value without consuming it.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn take(&self, key: &str) -> Option<String> {
        self.lock().remove(key)
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_take_returns_the_value() {
        let store = MemorySessionStore::new();
        store.put("sid:oauth_state", "abc123");
        assert_eq!(store.take("sid:oauth_state").as_deref(), Some("abc123"));
    }

    #[test]
    fn take_consumes_the_value() {
        let store = MemorySessionStore::new();
        store.put("k", "v");
        assert!(store.take("k").is_some());
        assert!(store.take("k").is_none());
    }

    #[test]
    fn take_of_absent_key_is_none() {
        let store = MemorySessionStore::new();
        assert!(store.take("missing").is_none());
    }

    #[test]
    fn put_replaces_previous_value() {
        let store = MemorySessionStore::new();
        store.put("k", "old");
        store.put("k", "new");
        assert_eq!(store.take("k").as_deref(), Some("new"));
    }

    #[test]
    fn remove_discards_without_returning() {
        let store = MemorySessionStore::new();
        store.put("k", "v");
        store.remove("k");
        assert!(store.get("k").is_none());
    }
}
