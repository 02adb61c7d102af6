//! One dashboard session, mount to unmount
//!
//! The session is the explicit context object that owns everything a mounted
//! dashboard needs: the cache tiers, the preference store, the expanded-region
//! tracker and the refresh coordinator. Nothing is ambient; two sessions in
//! one process never share state.
//!
//! Mount sequence:
//! 1. hydrate preferences from the local cache (before any network round trip)
//! 2. render the freshest cached snapshot, if any, flagged `is_cached`
//! 3. quick load (database-only stats)
//! 4. reconcile preferences with the authoritative server copy
//! 5. start the 30s silent auto-refresh timer
//!
//! Unmount cancels the timer and abandons anything in flight.

use super::state::RefreshOutcome;
use super::RefreshCoordinator;
use crate::api::{ PreferencesApi, StatsApi };
use crate::cache::store::KeyValueStore;
use crate::cache::{ FileStore, MemoryStore, TieredCache };
use crate::core::{ DashboardConfig, PreferenceBundle };
use crate::display::{ DisplayStateTracker, PresentationAdapter };
use crate::logger::{ self, LogTag };
use crate::prefs::PreferenceStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct DashboardSession {
    cache: Arc<TieredCache>,
    prefs: Arc<PreferenceStore>,
    tracker: Arc<DisplayStateTracker>,
    coordinator: Arc<RefreshCoordinator>,
    prefs_api: Arc<dyn PreferencesApi>,
    auto_refresh: Mutex<Option<JoinHandle<()>>>,
}

impl DashboardSession {
    /// Session with the standard storage layout: in-memory session tier,
    /// file-backed persistent tier under the data directory.
    pub fn new(
        api: Arc<dyn StatsApi>,
        prefs_api: Arc<dyn PreferencesApi>,
        adapter: Arc<dyn PresentationAdapter>,
        config: DashboardConfig,
    ) -> Self {
        Self::with_stores(
            api,
            prefs_api,
            adapter,
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(FileStore::at_data_dir()),
        )
    }

    /// Session with explicit storage backends (tests inject memory stores).
    pub fn with_stores(
        api: Arc<dyn StatsApi>,
        prefs_api: Arc<dyn PreferencesApi>,
        adapter: Arc<dyn PresentationAdapter>,
        config: DashboardConfig,
        session_store: Arc<dyn KeyValueStore>,
        persistent_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let cache = Arc::new(
            TieredCache::new(session_store, persistent_store.clone(), config.session_ttl)
        );
        let prefs = Arc::new(PreferenceStore::new(persistent_store, prefs_api.clone()));
        let tracker = Arc::new(DisplayStateTracker::new());
        let coordinator = Arc::new(
            RefreshCoordinator::new(api, cache.clone(), tracker.clone(), adapter, config)
        );

        Self {
            cache,
            prefs,
            tracker,
            coordinator,
            prefs_api,
            auto_refresh: Mutex::new(None),
        }
    }

    pub async fn mount(&self) {
        logger::info(LogTag::Dashboard, "Mounting dashboard session");
        self.coordinator.set_mounted();

        if self.prefs.load_from_cache() {
            logger::debug(LogTag::Prefs, "Preferences hydrated from local cache");
        }

        if self.coordinator.display_cached() {
            logger::info(LogTag::Dashboard, "Initial render served from cache");
        }

        self.coordinator.quick_load().await;
        self.sync_preferences().await;

        *self.auto_refresh.lock() = Some(self.coordinator.start_auto_refresh());
    }

    /// Manually triggered refresh (the dashboard's refresh button): visible
    /// indicators, force-fetch past the backend cache.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.coordinator.refresh(true, false).await
    }

    pub fn unmount(&self) {
        logger::info(LogTag::Dashboard, "Unmounting dashboard session");
        self.coordinator.unmount();
        if let Some(handle) = self.auto_refresh.lock().take() {
            handle.abort();
        }
    }

    /// Fetch the authoritative preferences and reconcile. Re-renders from
    /// cache only when the merge actually changed something, so an in-flight
    /// local reorder is never undone by a no-op sync.
    pub async fn sync_preferences(&self) {
        let server = match self.prefs_api.fetch_preferences().await {
            Ok(server) => server,
            Err(e) => {
                logger::warning(LogTag::Prefs, &format!("Preference fetch failed: {}", e));
                return;
            }
        };

        let defaults = PreferenceBundle::defaults();
        let outcome = self.prefs.merge_with_authoritative(server, &defaults);
        if outcome.changed {
            logger::debug(LogTag::Prefs, "Preferences changed after merge, re-rendering");
            self.coordinator.display_cached();
        }
    }

    /// User reordered or hid cards/sections: optimistic local write, then
    /// authoritative persist (failure logged, not surfaced).
    pub async fn save_preferences(&self, bundle: &PreferenceBundle) {
        self.prefs.save(bundle).await;
    }

    pub fn cache(&self) -> &Arc<TieredCache> {
        &self.cache
    }

    pub fn prefs(&self) -> &Arc<PreferenceStore> {
        &self.prefs
    }

    pub fn tracker(&self) -> &Arc<DisplayStateTracker> {
        &self.tracker
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }
}
