//! In-memory string-keyed cache with per-entry TTL.
//!
//! No eviction sweep: entries are removed lazily the first time a read
//! finds them expired. Keys are bounded in practice (the 26 counties plus
//! user-typed search terms), so the map stays small.

use std::collections::HashMap;
use std::sync::Mutex;

struct CacheEntry<T> {
    value: T,
    expires_at_ms: i64,
}

/// Concurrency-safe TTL cache. One instance per concern (bounds, town
/// lists, search results), each with its own TTL at the call site.
pub struct ResultCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> ResultCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value if present and unexpired; evict and miss otherwise.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = chrono::Utc::now().timestamp_millis();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at_ms => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Unconditionally overwrite the key with a fresh expiry.
    pub fn set(&self, key: &str, value: T, ttl_minutes: i64) {
        let expires_at_ms = chrono::Utc::now().timestamp_millis() + ttl_minutes * 60_000;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), CacheEntry { value, expires_at_ms });
    }

    /// Number of stored entries, expired or not (for testing).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
