//! Three-tier stats cache
//!
//! - **Ephemeral**: in-memory, no TTL. Overwritten on every successful fetch,
//!   serves instantaneous re-renders (navigating back to the dashboard).
//! - **Session**: valid for the lifetime of one dashboard session, 300s TTL.
//!   An expired entry deletes itself on read.
//! - **Persistent**: survives restarts, never expires on read. Last-known-good
//!   fallback; only ever superseded by newer data, never invalidated by time.
//!
//! All operations are synchronous and touch nothing but the backing store.
//! Storage failures on the persistent tier are logged and swallowed: the
//! feature degrades to in-memory caching for the session.

pub mod store;

use crate::core::constants::{ STATS_PERSISTENT_KEY, STATS_SESSION_KEY };
use crate::core::{ CacheEntry, StatsSnapshot };
use crate::logger::{ self, LogTag };
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use store::KeyValueStore;

pub use store::{ FileStore, MemoryStore };

pub struct TieredCache {
    ephemeral: Mutex<Option<CacheEntry<StatsSnapshot>>>,
    session: Arc<dyn KeyValueStore>,
    persistent: Arc<dyn KeyValueStore>,
    session_ttl: Duration,
}

impl TieredCache {
    pub fn new(
        session: Arc<dyn KeyValueStore>,
        persistent: Arc<dyn KeyValueStore>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            ephemeral: Mutex::new(None),
            session,
            persistent,
            session_ttl,
        }
    }

    // =========================================================================
    // EPHEMERAL TIER
    // =========================================================================

    pub fn read_ephemeral(&self) -> Option<StatsSnapshot> {
        self.ephemeral
            .lock()
            .as_ref()
            .map(|entry| entry.value.clone())
    }

    pub fn write_ephemeral(&self, stats: &StatsSnapshot) {
        *self.ephemeral.lock() = Some(CacheEntry::new(stats.clone()));
    }

    // =========================================================================
    // SESSION TIER
    // =========================================================================

    /// Read the session tier. Returns the snapshot and its age in seconds, or
    /// `None` (deleting the entry) once the age exceeds the TTL.
    pub fn read_session(&self) -> Option<(StatsSnapshot, u64)> {
        let raw = self.session.get(STATS_SESSION_KEY)?;

        let entry: CacheEntry<StatsSnapshot> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                logger::debug(
                    LogTag::Cache,
                    &format!("Discarding malformed session cache entry: {}", e)
                );
                self.session.remove(STATS_SESSION_KEY);
                return None;
            }
        };

        let age = entry.age_seconds();
        if age > self.session_ttl.as_secs() {
            logger::debug(
                LogTag::Cache,
                &format!("Session cache expired (age {}s > {}s)", age, self.session_ttl.as_secs())
            );
            self.session.remove(STATS_SESSION_KEY);
            return None;
        }

        Some((entry.value, age))
    }

    pub fn write_session(&self, stats: &StatsSnapshot) {
        self.write_tier(&*self.session, STATS_SESSION_KEY, stats);
    }

    // =========================================================================
    // PERSISTENT TIER
    // =========================================================================

    /// Read the persistent tier. No expiry check: this is the last-known-good
    /// fallback. Malformed stored data yields `None`, never an error.
    pub fn read_persistent(&self) -> Option<StatsSnapshot> {
        let raw = self.persistent.get(STATS_PERSISTENT_KEY)?;

        match serde_json::from_str::<CacheEntry<StatsSnapshot>>(&raw) {
            Ok(entry) => Some(entry.value),
            Err(e) => {
                logger::warning(
                    LogTag::Cache,
                    &format!("Ignoring malformed persistent cache entry: {}", e)
                );
                None
            }
        }
    }

    pub fn write_persistent(&self, stats: &StatsSnapshot) {
        self.write_tier(&*self.persistent, STATS_PERSISTENT_KEY, stats);
    }

    /// Serialize and store an entry. Storage failures (quota, disabled
    /// storage) are logged and swallowed; the tiers in memory still hold the
    /// data for this session.
    fn write_tier(&self, store: &dyn KeyValueStore, key: &str, stats: &StatsSnapshot) {
        let entry = CacheEntry::new(stats.clone());

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                logger::warning(LogTag::Cache, &format!("Failed to serialize {}: {}", key, e));
                return;
            }
        };

        if let Err(e) = store.set(key, &raw) {
            logger::warning(LogTag::Cache, &format!("Cache write failed for {}: {}", key, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::SESSION_CACHE_TTL_SECS;
    use chrono::{ Duration as ChronoDuration, Utc };
    use super::store::test_support::FailingStore;

    fn sample_stats() -> StatsSnapshot {
        StatsSnapshot {
            total_users: 42,
            active_subscriptions: 37,
            ..Default::default()
        }
    }

    fn memory_cache() -> TieredCache {
        TieredCache::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Duration::from_secs(SESSION_CACHE_TTL_SECS),
        )
    }

    #[test]
    fn test_ephemeral_round_trip() {
        let cache = memory_cache();
        assert!(cache.read_ephemeral().is_none());
        cache.write_ephemeral(&sample_stats());
        assert_eq!(cache.read_ephemeral().unwrap(), sample_stats());
    }

    #[test]
    fn test_session_round_trip_within_ttl() {
        let cache = memory_cache();
        cache.write_session(&sample_stats());
        let (stats, age) = cache.read_session().unwrap();
        assert_eq!(stats, sample_stats());
        assert!(age <= 1);
    }

    #[test]
    fn test_session_expires_and_deletes_itself() {
        let session: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let cache = TieredCache::new(
            session.clone(),
            Arc::new(MemoryStore::new()),
            Duration::from_secs(SESSION_CACHE_TTL_SECS),
        );

        // Entry stored 301 seconds ago
        let entry = CacheEntry {
            value: sample_stats(),
            stored_at: Utc::now() - ChronoDuration::seconds(301),
        };
        session.set(STATS_SESSION_KEY, &serde_json::to_string(&entry).unwrap()).unwrap();

        assert!(cache.read_session().is_none());
        // The expired entry was removed, not just skipped
        assert!(session.get(STATS_SESSION_KEY).is_none());
    }

    #[test]
    fn test_persistent_round_trip_regardless_of_age() {
        let persistent: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let cache = TieredCache::new(
            Arc::new(MemoryStore::new()),
            persistent.clone(),
            Duration::from_secs(SESSION_CACHE_TTL_SECS),
        );

        // Entry from a session three days ago still reads back
        let entry = CacheEntry {
            value: sample_stats(),
            stored_at: Utc::now() - ChronoDuration::days(3),
        };
        persistent.set(STATS_PERSISTENT_KEY, &serde_json::to_string(&entry).unwrap()).unwrap();

        assert_eq!(cache.read_persistent().unwrap(), sample_stats());
    }

    #[test]
    fn test_persistent_malformed_yields_none() {
        let persistent: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let cache = TieredCache::new(
            Arc::new(MemoryStore::new()),
            persistent.clone(),
            Duration::from_secs(SESSION_CACHE_TTL_SECS),
        );

        persistent.set(STATS_PERSISTENT_KEY, "{not json").unwrap();
        assert!(cache.read_persistent().is_none());
    }

    #[test]
    fn test_persistent_write_failure_is_swallowed() {
        let cache = TieredCache::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingStore),
            Duration::from_secs(SESSION_CACHE_TTL_SECS),
        );

        // Must not panic or propagate
        cache.write_persistent(&sample_stats());
        assert!(cache.read_persistent().is_none());
    }

    #[test]
    fn test_persistent_overwritten_by_newer_data() {
        let cache = memory_cache();
        cache.write_persistent(&sample_stats());

        let newer = StatsSnapshot {
            total_users: 100,
            ..Default::default()
        };
        cache.write_persistent(&newer);
        assert_eq!(cache.read_persistent().unwrap().total_users, 100);
    }
}
