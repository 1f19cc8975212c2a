//! Read-through cache of configurations keyed by tenant and type.
//!
//! Entries expire after a fixed TTL. A poisoned lock degrades to a cache
//! miss; the store stays authoritative.
//!
//! Every fill carries the key's [`Generation`] observed before the store was
//! touched. Any fill or invalidation bumps the generation, and a fill whose
//! generation is no longer current evicts the key instead of writing. A
//! response that read the store before a concurrent write can therefore never
//! leave its older copy behind.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use form_engine_core::{ConfigKey, Configuration};

#[derive(Debug)]
struct CacheEntry {
    configuration: Configuration,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<ConfigKey, CacheEntry>,
    generations: HashMap<ConfigKey, u64>,
}

impl CacheState {
    fn bump(&mut self, key: &ConfigKey) {
        *self.generations.entry(key.clone()).or_insert(0) += 1;
    }
}

/// Write counter of one key, taken before reading or writing the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// TTL cache in front of the configuration store.
#[derive(Debug)]
pub struct ConfigCache {
    state: Mutex<CacheState>,
    ttl: Duration,
}

impl ConfigCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => {
                tracing::warn!("Config cache lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Returns a live entry, evicting it if it has expired.
    pub fn get(&self, key: &ConfigKey) -> Option<Configuration> {
        let mut state = self.lock();
        let now = Instant::now();
        let expired = match state.entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                tracing::debug!(key = %key, "Config cache hit");
                return Some(entry.configuration.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.entries.remove(key);
            tracing::debug!(key = %key, "Config cache entry expired");
        } else {
            tracing::debug!(key = %key, "Config cache miss");
        }
        None
    }

    /// Current generation of a key.
    pub fn generation(&self, key: &ConfigKey) -> Generation {
        Generation(self.lock().generations.get(key).copied().unwrap_or(0))
    }

    /// Caches a configuration read or written under `seen`.
    ///
    /// # Returns
    /// `true` when cached. `false` when the key moved on since `seen`; the
    /// key is then evicted so the next read goes to the store.
    pub fn fill(&self, configuration: &Configuration, seen: Generation) -> bool {
        let key = configuration.key();
        let mut state = self.lock();
        let current = state.generations.get(&key).copied().unwrap_or(0);
        state.bump(&key);
        if current != seen.0 {
            state.entries.remove(&key);
            tracing::debug!(key = %key, "Config cache fill superseded, evicting");
            return false;
        }
        state.entries.insert(
            key,
            CacheEntry {
                configuration: configuration.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        true
    }

    pub fn invalidate(&self, key: &ConfigKey) {
        let mut state = self.lock();
        state.bump(key);
        state.entries.remove(key);
    }

    /// Drops every entry, returning how many were held.
    pub fn flush(&self) -> usize {
        let mut state = self.lock();
        let count = state.entries.len();
        state.entries.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConfigStore;
    use form_engine_core::{ConfigType, ConfigurationPatch};
    use ntest::timeout;

    fn cache() -> ConfigCache {
        ConfigCache::new(Duration::from_secs(60))
    }

    #[test]
    #[timeout(1000)]
    fn test_fill_get_invalidate() {
        let cache = cache();
        let config = Configuration::draft("t1", ConfigType::PatientDetails);
        let key = config.key();

        assert!(cache.get(&key).is_none());
        assert!(cache.fill(&config, cache.generation(&key)));
        assert_eq!(cache.get(&key), Some(config));
        cache.invalidate(&key);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    #[timeout(1000)]
    fn test_entries_expire() {
        let cache = ConfigCache::new(Duration::ZERO);
        let config = Configuration::draft("t1", ConfigType::PatientDetails);
        assert!(cache.fill(&config, cache.generation(&config.key())));
        assert!(cache.get(&config.key()).is_none());
    }

    #[test]
    #[timeout(1000)]
    fn test_flush_clears_everything() {
        let cache = cache();
        for tenant in ["t1", "t2"] {
            let config = Configuration::draft(tenant, ConfigType::PatientDetails);
            cache.fill(&config, cache.generation(&config.key()));
        }
        assert_eq!(cache.flush(), 2);
        assert_eq!(cache.flush(), 0);
    }

    #[test]
    #[timeout(1000)]
    fn test_read_racing_delete_does_not_resurrect() {
        let store = ConfigStore::new();
        let cache = cache();
        let created = store
            .create(Configuration::draft("t1", ConfigType::PatientSearch))
            .unwrap();
        let key = created.key();

        // Reader misses and reads the store
        let seen = cache.generation(&key);
        let read = store.get(&key).unwrap();

        // Delete completes in between
        cache.invalidate(&key);
        store.delete(&key).unwrap();

        // Reader's late fill is refused
        assert!(!cache.fill(&read, seen));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    #[timeout(1000)]
    fn test_racing_updates_never_cache_the_older_one() {
        let store = ConfigStore::new();
        let cache = cache();
        let key = store
            .create(Configuration::draft("t1", ConfigType::PatientSearch))
            .unwrap()
            .key();
        let patch = |d: &str| ConfigurationPatch {
            description: Some(d.to_string()),
            fields: Vec::new(),
        };

        // A writes the store, B writes store and cache, then A fills
        let seen_a = cache.generation(&key);
        let seen_b = cache.generation(&key);
        let a = store.update(&key, patch("a")).unwrap();
        let b = store.update(&key, patch("b")).unwrap();
        assert!(cache.fill(&b, seen_b));
        assert!(!cache.fill(&a, seen_a));
        assert!(cache.get(&key).is_none());

        // Opposite order: A fills first, B's fill evicts it
        let seen_a = cache.generation(&key);
        let seen_b = cache.generation(&key);
        let a = store.update(&key, patch("a2")).unwrap();
        let b = store.update(&key, patch("b2")).unwrap();
        assert!(cache.fill(&a, seen_a));
        assert!(!cache.fill(&b, seen_b));
        assert!(cache.get(&key).is_none());

        // Whatever got cached afterwards matches the store
        let seen = cache.generation(&key);
        let current = store.get(&key).unwrap();
        assert!(cache.fill(&current, seen));
        assert_eq!(cache.get(&key), Some(store.get(&key).unwrap()));
        assert_eq!(current.description.as_deref(), Some("b2"));
    }

    #[test]
    #[timeout(1000)]
    fn test_read_after_write_is_cached() {
        let store = ConfigStore::new();
        let cache = cache();
        let key = store
            .create(Configuration::draft("t1", ConfigType::PatientBilling))
            .unwrap()
            .key();

        let seen = cache.generation(&key);
        let updated = store
            .update(
                &key,
                ConfigurationPatch {
                    description: Some("new".to_string()),
                    fields: Vec::new(),
                },
            )
            .unwrap();
        assert!(cache.fill(&updated, seen));

        // A read starting after the write fills normally
        let seen = cache.generation(&key);
        let read = store.get(&key).unwrap();
        assert!(cache.fill(&read, seen));
        assert_eq!(cache.get(&key), Some(updated));
    }
}
