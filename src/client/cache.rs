//! Response cache for successful reads.
//!
//! Entries are grouped by resource kind and keyed by the request path and
//! query. Nothing expires; entries leave only through explicit removal after a
//! mutation. Every removal bumps a generation counter and a read may only
//! populate the cache if no removal happened while it was in flight, so a
//! response issued before a committed write can never be served after it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<&'static str, HashMap<String, Arc<Value>>>,
    generation: u64,
}

/// Shared handle to the cache; clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    inner: Arc<Mutex<CacheState>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current invalidation generation. Capture before issuing a read.
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    pub fn get(&self, kind: &str, key: &str) -> Option<Arc<Value>> {
        self.state()
            .entries
            .get(kind)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    /// Store a response read at `generation`. Dropped if anything was
    /// invalidated since.
    pub fn insert(&self, kind: &'static str, key: &str, body: Value, generation: u64) -> bool {
        let mut state = self.state();
        if state.generation != generation {
            tracing::debug!(kind, key, "Not caching response that raced an invalidation");
            return false;
        }
        state
            .entries
            .entry(kind)
            .or_default()
            .insert(key.to_string(), Arc::new(body));
        true
    }

    pub fn remove(&self, kind: &str, key: &str) -> bool {
        let mut state = self.state();
        state.generation += 1;
        state
            .entries
            .get_mut(kind)
            .map(|entries| entries.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Drop every entry of one resource kind.
    pub fn remove_all(&self, kind: &str) -> usize {
        let mut state = self.state();
        state.generation += 1;
        state
            .entries
            .get_mut(kind)
            .map(|entries| {
                let count = entries.len();
                entries.clear();
                count
            })
            .unwrap_or(0)
    }

    /// Drop every entry, of any kind, whose key is `pattern` or lies under it
    /// as a sub-path (`pattern/...`) or a query variant (`pattern?...`).
    pub fn invalidate(&self, pattern: &str) -> usize {
        let pattern = pattern.split('?').next().unwrap_or(pattern);
        let mut state = self.state();
        state.generation += 1;

        let mut removed = 0;
        for entries in state.entries.values_mut() {
            let before = entries.len();
            entries.retain(|key, _| !covers(pattern, key));
            removed += before - entries.len();
        }
        tracing::debug!(pattern, removed, "Invalidated cache entries");
        removed
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.generation += 1;
        state.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state().entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn covers(pattern: &str, key: &str) -> bool {
    match key.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TRIGGERS_KEY: &str = "/api/triggers?organization=1&repository=2";

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new();
        let generation = cache.generation();
        assert!(cache.insert("triggers", TRIGGERS_KEY, json!([]), generation));
        assert_eq!(*cache.get("triggers", TRIGGERS_KEY).unwrap(), json!([]));
        assert!(cache.get("organizations", TRIGGERS_KEY).is_none());
    }

    #[test]
    fn test_insert_after_invalidation_is_dropped() {
        let cache = ResponseCache::new();
        let generation = cache.generation();

        // A write commits while the read is in flight.
        cache.invalidate("/api/triggers");

        assert!(!cache.insert("triggers", TRIGGERS_KEY, json!([{"event": "push"}]), generation));
        assert!(cache.get("triggers", TRIGGERS_KEY).is_none());
    }

    #[test]
    fn test_invalidate_covers_query_variants_and_sub_paths() {
        let cache = ResponseCache::new();
        let g = cache.generation();
        cache.insert("triggers", TRIGGERS_KEY, json!([]), g);
        cache.insert("triggers", "/api/triggers?organization=3", json!([]), g);
        cache.insert("repository", "/api/organizations/1/repositories/2", json!({}), g);
        cache.insert("builds", "/api/organizations/1/repositories/2/builds", json!([]), g);
        cache.insert("builds", "/api/organizations/1/repositories/22/builds", json!([]), g);

        assert_eq!(cache.invalidate("/api/triggers"), 2);
        assert_eq!(cache.invalidate("/api/organizations/1/repositories/2"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache
            .get("builds", "/api/organizations/1/repositories/22/builds")
            .is_some());
    }

    #[test]
    fn test_remove_all_only_touches_one_kind() {
        let cache = ResponseCache::new();
        let g = cache.generation();
        cache.insert("organizations", "/api/organizations", json!([]), g);
        cache.insert("profile", "/api/profile", json!({}), g);

        assert_eq!(cache.remove_all("organizations"), 1);
        assert!(cache.get("profile", "/api/profile").is_some());
        assert_eq!(cache.remove_all("organizations"), 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ResponseCache::new();
        let g = cache.generation();
        cache.insert("profile", "/api/profile", json!({}), g);
        assert!(cache.remove("profile", "/api/profile"));
        assert!(!cache.remove("profile", "/api/profile"));

        let g = cache.generation();
        cache.insert("profile", "/api/profile", json!({}), g);
        cache.clear();
        assert!(cache.is_empty());
    }
}
