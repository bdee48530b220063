//! Injectable key-value cache with TTL.
//!
//! Replaces the module-level mutable cache the original helper code used:
//! construct one where caching is needed and pass it down, scoped to the
//! process or request lifetime.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct CachedValue<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CachedValue<V> {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Thread-safe key-value cache where every entry expires after the
/// configured TTL.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CachedValue<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the value for `key` if present and unexpired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|cached| cached.is_valid())
            .map(|cached| cached.value.clone())
    }

    /// Insert or replace the value for `key`, restarting its TTL.
    pub async fn put(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedValue {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
        // Opportunistically drop expired entries so the map cannot grow
        // without bound across long processes.
        entries.retain(|_, cached| cached.is_valid());
    }

    /// Drop the value for `key`.
    pub async fn invalidate(&self, key: &K) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Drop everything.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}
