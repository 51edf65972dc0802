use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// TTL used by the reference application for chart values and version lists.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Build the cache key for a document name and optional version.
///
/// An empty version means "default/latest" and maps to the bare name.
pub fn build_key(name: &str, version: &str) -> String {
    if version.is_empty() {
        name.to_owned()
    } else {
        format!("{name}@{version}")
    }
}

/// A cached payload and the instant it was stored.
#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// In-memory, TTL-bound cache keyed by [`build_key`].
///
/// All entries live behind a `RwLock`: lookups share it, writes take it
/// exclusively. Values are cloned on read. The TTL is fixed at construction
/// and applies to every entry.
pub struct ExpiringStore<V = String> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ExpiringStore<V> {
    /// Create an empty store on the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create an empty store reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// The expiry window applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh entry. Absent and stale entries are both a miss.
    pub fn get(&self, name: &str, version: &str) -> Option<V> {
        let key = build_key(name, version);
        let now = self.clock.now();
        let map = self.read();

        match map.get(&key) {
            None => {
                debug!(%key, "cache miss");
                None
            }
            Some(entry) if self.is_stale(entry, now) => {
                debug!(%key, "cache entry expired");
                None
            }
            Some(entry) => {
                debug!(%key, "cache hit");
                Some(entry.value.clone())
            }
        }
    }

    /// Insert or overwrite the entry for `name`/`version`, stamped with the
    /// current clock reading.
    pub fn set(&self, name: &str, version: &str, value: V) {
        let key = build_key(name, version);
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        debug!(%key, "cache store");
        self.write().insert(key, entry);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut map = self.write();
        debug!(entries = map.len(), "cache cleared");
        map.clear();
    }

    /// Returns `true` if a fresh entry exists for `name`/`version`.
    pub fn contains_fresh(&self, name: &str, version: &str) -> bool {
        let key = build_key(name, version);
        let now = self.clock.now();
        self.read()
            .get(&key)
            .is_some_and(|entry| !self.is_stale(entry, now))
    }

    /// Remove stale entries and return how many were dropped.
    ///
    /// Reads never do this on their own; callers that hold a store for a long
    /// time can call it to bound memory.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut map = self.write();
        let before = map.len();
        map.retain(|_, entry| !self.is_stale(entry, now));
        let purged = before - map.len();
        if purged > 0 {
            debug!(purged, "purged expired cache entries");
        }
        purged
    }

    /// Number of entries held, stale ones included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn is_stale(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) > self.ttl
    }

    // A panic while holding the lock cannot leave the map half-updated: every
    // write is a single insert, retain, or clear. Keep serving it.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for ExpiringStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V: Clone> fmt::Debug for ExpiringStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("entry_count", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use proptest::prelude::*;
    use std::thread;

    const TTL: Duration = Duration::from_secs(60);

    fn manual_store() -> (ExpiringStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let store = ExpiringStore::with_clock(TTL, clock.clone());
        (store, clock)
    }

    #[test]
    fn key_without_version_is_name() {
        assert_eq!(build_key("nginx", ""), "nginx");
    }

    #[test]
    fn key_with_version_joins_with_at() {
        assert_eq!(build_key("bitnami/nginx", "15.1.0"), "bitnami/nginx@15.1.0");
    }

    #[test]
    fn set_then_get() {
        let (store, _) = manual_store();
        store.set("nginx", "1.0.0", "replicas: 1".to_string());
        assert_eq!(store.get("nginx", "1.0.0"), Some("replicas: 1".to_string()));
    }

    #[test]
    fn absent_key_is_miss() {
        let (store, _) = manual_store();
        assert_eq!(store.get("nginx", ""), None);
        assert!(!store.contains_fresh("nginx", ""));
    }

    #[test]
    fn versions_are_distinct_entries() {
        let (store, _) = manual_store();
        store.set("nginx", "", "latest".to_string());
        store.set("nginx", "1.0.0", "pinned".to_string());
        assert_eq!(store.get("nginx", ""), Some("latest".to_string()));
        assert_eq!(store.get("nginx", "1.0.0"), Some("pinned".to_string()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn entry_at_exact_ttl_is_still_fresh() {
        let (store, clock) = manual_store();
        store.set("nginx", "", "v".to_string());
        clock.advance(TTL);
        assert_eq!(store.get("nginx", ""), Some("v".to_string()));
    }

    #[test]
    fn entry_past_ttl_is_miss_but_retained() {
        let (store, clock) = manual_store();
        store.set("nginx", "", "v".to_string());
        clock.advance(TTL + Duration::from_millis(1));
        assert_eq!(store.get("nginx", ""), None);
        assert!(!store.contains_fresh("nginx", ""));
        // Lazy expiry: the stale entry is still held.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn overwrite_restamps_entry() {
        let (store, clock) = manual_store();
        store.set("nginx", "", "old".to_string());
        clock.advance(TTL + Duration::from_secs(1));
        store.set("nginx", "", "new".to_string());
        assert_eq!(store.get("nginx", ""), Some("new".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let (store, _) = manual_store();
        store.set("a", "", "1".to_string());
        store.set("b", "2.0", "2".to_string());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("a", ""), None);
    }

    #[test]
    fn purge_removes_only_stale_entries() {
        let (store, clock) = manual_store();
        store.set("old", "", "1".to_string());
        clock.advance(Duration::from_secs(45));
        store.set("young", "", "2".to_string());
        clock.advance(Duration::from_secs(30));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("young", ""), Some("2".to_string()));
    }

    #[test]
    fn generic_payload() {
        let clock = Arc::new(ManualClock::new());
        let store: ExpiringStore<Vec<String>> = ExpiringStore::with_clock(TTL, clock);
        store.set("nginx", "", vec!["2.0.0".into(), "1.0.0".into()]);
        assert_eq!(store.get("nginx", "").map(|v| v.len()), Some(2));
    }

    #[test]
    fn default_uses_thirty_minutes() {
        let store: ExpiringStore = ExpiringStore::default();
        assert_eq!(store.ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let store = Arc::new(ExpiringStore::<String>::new(TTL));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let version = format!("{t}.{i}");
                        store.set("chart", &version, version.clone());
                        assert_eq!(store.get("chart", &version), Some(version));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 800);
    }

    #[test]
    fn debug_shows_count() {
        let (store, _) = manual_store();
        store.set("a", "", "1".to_string());
        let rendered = format!("{store:?}");
        assert!(rendered.contains("entry_count: 1"));
    }

    proptest! {
        #[test]
        fn empty_version_key_is_name(name in ".*") {
            prop_assert_eq!(build_key(&name, ""), name);
        }

        #[test]
        fn versioned_key_is_name_at_version(name in ".*", version in ".+") {
            prop_assert_eq!(build_key(&name, &version), format!("{}@{}", name, version));
        }

        #[test]
        fn set_get_roundtrip(name in "[a-z/]{1,12}", version in "[0-9.]{0,8}", text in ".*") {
            let (store, _) = manual_store();
            store.set(&name, &version, text.clone());
            prop_assert_eq!(store.get(&name, &version), Some(text));
        }
    }
}
