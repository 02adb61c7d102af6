//! Card/section display preference store
//!
//! Preferences live in two places: a local cached copy (so the very first
//! render uses the user's ordering, before any network round trip) and the
//! authoritative server copy. The merge rules keep them reconciled:
//!
//! - server has nothing saved -> adopt the built-in defaults
//! - otherwise adopt the server's order and hidden set, then append any id
//!   the defaults know about but the saved order has never seen (stable
//!   append, so user-chosen relative positions survive upgrades)
//! - `hidden` is kept a subset of `order`
//!
//! Saves are optimistic: the local cache is written immediately, the
//! authoritative persist happens afterwards and a failure there is logged,
//! never surfaced, and never rolls back the local write.

use crate::api::PreferencesApi;
use crate::cache::store::KeyValueStore;
use crate::core::constants::PREFS_KEY;
use crate::core::{ CacheEntry, PreferenceBundle, PreferenceSet };
use crate::logger::{ self, LogTag };
use parking_lot::Mutex;
use std::sync::Arc;

/// Result of reconciling local and authoritative preferences.
pub struct MergeOutcome {
    pub merged: PreferenceBundle,
    /// True when the merged result differs from what was loaded locally.
    /// Callers re-render only in that case, so an in-flight local reorder is
    /// not undone by a no-op merge.
    pub changed: bool,
}

pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn PreferencesApi>,
    current: Mutex<Option<PreferenceBundle>>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>, api: Arc<dyn PreferencesApi>) -> Self {
        Self {
            store,
            api,
            current: Mutex::new(None),
        }
    }

    /// Hydrate the in-memory preferences from the local cache. Returns whether
    /// anything was found. Callable before any network round trip so the first
    /// render already uses the right ordering.
    pub fn load_from_cache(&self) -> bool {
        let Some(raw) = self.store.get(PREFS_KEY) else {
            return false;
        };

        match serde_json::from_str::<CacheEntry<PreferenceBundle>>(&raw) {
            Ok(entry) => {
                *self.current.lock() = Some(entry.value);
                true
            }
            Err(e) => {
                logger::warning(
                    LogTag::Prefs,
                    &format!("Ignoring malformed cached preferences: {}", e)
                );
                false
            }
        }
    }

    /// Currently effective preferences (loaded/merged, or the defaults).
    pub fn current(&self) -> PreferenceBundle {
        self.current
            .lock()
            .clone()
            .unwrap_or_else(PreferenceBundle::defaults)
    }

    /// Reconcile the server's saved preferences with the built-in defaults,
    /// adopt the result, and report whether it differs from what was loaded.
    pub fn merge_with_authoritative(
        &self,
        server: Option<PreferenceBundle>,
        defaults: &PreferenceBundle,
    ) -> MergeOutcome {
        let merged = PreferenceBundle {
            cards: merge_set(server.as_ref().map(|b| &b.cards), &defaults.cards),
            sections: merge_set(server.as_ref().map(|b| &b.sections), &defaults.sections),
        };

        let mut current = self.current.lock();
        let changed = current.as_ref() != Some(&merged);
        *current = Some(merged.clone());
        drop(current);

        if changed {
            self.write_local(&merged);
        }

        MergeOutcome { merged, changed }
    }

    /// Persist preferences: local cache immediately, authoritative store
    /// afterwards. A remote failure is logged only.
    pub async fn save(&self, bundle: &PreferenceBundle) {
        *self.current.lock() = Some(bundle.clone());
        self.write_local(bundle);

        if let Err(e) = self.api.save_preferences(bundle).await {
            logger::warning(
                LogTag::Prefs,
                &format!("Failed to persist preferences to server: {}", e)
            );
        }
    }

    fn write_local(&self, bundle: &PreferenceBundle) {
        let entry = CacheEntry::new(bundle.clone());
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.store.set(PREFS_KEY, &raw) {
                    logger::warning(
                        LogTag::Prefs,
                        &format!("Local preference cache write failed: {}", e)
                    );
                }
            }
            Err(e) => {
                logger::warning(LogTag::Prefs, &format!("Failed to serialize preferences: {}", e));
            }
        }
    }
}

/// Merge one preference set. The server's saved order wins; ids it has never
/// seen are appended in default order. `hidden` is filtered to stay a subset
/// of `order`.
fn merge_set(server: Option<&PreferenceSet>, defaults: &PreferenceSet) -> PreferenceSet {
    let Some(saved) = server else {
        return defaults.clone();
    };

    let mut order = saved.order.clone();
    for id in &defaults.order {
        if !order.contains(id) {
            order.push(id.clone());
        }
    }

    let hidden = saved.hidden
        .iter()
        .filter(|id| order.contains(*id))
        .cloned()
        .collect();

    PreferenceSet { order, hidden }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::core::{ DashError, DashResult };
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    #[derive(Default)]
    struct MockPrefsApi {
        saves: AtomicUsize,
        fail_saves: bool,
    }

    #[async_trait]
    impl PreferencesApi for MockPrefsApi {
        async fn fetch_preferences(&self) -> DashResult<Option<PreferenceBundle>> {
            Ok(None)
        }

        async fn save_preferences(&self, _bundle: &PreferenceBundle) -> DashResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                Err(DashError::Network("server unreachable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn store_with_api(fail_saves: bool) -> (Arc<MemoryStore>, Arc<MockPrefsApi>, PreferenceStore) {
        let local: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let api = Arc::new(MockPrefsApi {
            saves: AtomicUsize::new(0),
            fail_saves,
        });
        let prefs = PreferenceStore::new(local.clone(), api.clone());
        (local, api, prefs)
    }

    fn set(order: &[&str], hidden: &[&str]) -> PreferenceSet {
        PreferenceSet {
            order: order
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hidden: hidden
                .iter()
                .map(|s| s.to_string())
                .collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn test_defaults_adopted_when_server_empty() {
        let (_, _, prefs) = store_with_api(false);
        let defaults = PreferenceBundle::defaults();

        let outcome = prefs.merge_with_authoritative(None, &defaults);
        assert_eq!(outcome.merged, defaults);
        assert!(outcome.changed);
    }

    #[test]
    fn test_new_ids_appended_preserving_saved_order() {
        let (_, _, prefs) = store_with_api(false);
        let defaults = PreferenceBundle {
            cards: set(&["a", "b", "c", "d"], &[]),
            sections: set(&["s1"], &[]),
        };
        let server = PreferenceBundle {
            // User moved "c" to the front; "b" and "d" are new in this build
            cards: set(&["c", "a"], &[]),
            sections: set(&["s1"], &[]),
        };

        let outcome = prefs.merge_with_authoritative(Some(server), &defaults);
        assert_eq!(outcome.merged.cards.order, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_hidden_kept_subset_of_order() {
        let (_, _, prefs) = store_with_api(false);
        let defaults = PreferenceBundle {
            cards: set(&["a", "b"], &[]),
            sections: set(&[], &[]),
        };
        let server = PreferenceBundle {
            // "ghost" was removed from the product entirely
            cards: set(&["a", "b"], &["b", "ghost"]),
            sections: set(&[], &[]),
        };

        let outcome = prefs.merge_with_authoritative(Some(server), &defaults);
        assert!(outcome.merged.cards.hidden.contains("b"));
        assert!(!outcome.merged.cards.hidden.contains("ghost"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let (_, _, prefs) = store_with_api(false);
        let defaults = PreferenceBundle::defaults();
        let server = PreferenceBundle {
            cards: set(&["monthly-revenue", "total-users"], &["expiring-soon"]),
            sections: set(&["plex-servers"], &[]),
        };

        let first = prefs.merge_with_authoritative(Some(server), &defaults);
        assert!(first.changed);

        // Feeding the merged result back in changes nothing
        let second = prefs.merge_with_authoritative(Some(first.merged.clone()), &defaults);
        assert!(!second.changed);
        assert_eq!(second.merged, first.merged);
    }

    #[test]
    fn test_load_from_cache_round_trip() {
        let (local, _, prefs) = store_with_api(false);
        assert!(!prefs.load_from_cache());

        let bundle = PreferenceBundle::defaults();
        let entry = CacheEntry::new(bundle.clone());
        local.set(PREFS_KEY, &serde_json::to_string(&entry).unwrap()).unwrap();

        assert!(prefs.load_from_cache());
        assert_eq!(prefs.current(), bundle);
    }

    #[tokio::test]
    async fn test_save_is_optimistic_on_remote_failure() {
        let (local, api, prefs) = store_with_api(true);
        let bundle = PreferenceBundle::defaults();

        prefs.save(&bundle).await;

        // Remote persist failed but the local write stands
        assert_eq!(api.saves.load(Ordering::SeqCst), 1);
        assert!(local.get(PREFS_KEY).is_some());
        assert_eq!(prefs.current(), bundle);
    }
}
