/// Data model for dashboard statistics and display preferences.
///
/// Snapshot shapes mirror what the panel backend aggregates from the Plex
/// servers, IPTV panels and the subscription database. Every field that a
/// backend version might omit carries `#[serde(default)]` so old or partial
/// payloads deserialize to absent values instead of failing the whole parse.

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use std::collections::HashSet;

/// One entry in a cache tier: the payload plus when it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    /// Whole seconds elapsed since the entry was stored. Clock skew can make
    /// the raw difference negative; clamp to zero.
    pub fn age_seconds(&self) -> u64 {
        let age = Utc::now().signed_duration_since(self.stored_at).num_seconds();
        age.max(0) as u64
    }
}

/// Aggregated dashboard statistics, one snapshot per fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_users: u64,

    #[serde(default)]
    pub active_subscriptions: u64,

    /// Subscriptions expiring within the next 7 days.
    #[serde(default)]
    pub expiring_soon: u64,

    #[serde(default)]
    pub monthly_revenue: f64,

    #[serde(default)]
    pub plex_servers: Vec<ServerSnapshot>,

    #[serde(default)]
    pub iptv_panels: Vec<PanelSnapshot>,

    /// 30-day watch aggregation. Expensive to compute; only present on full
    /// loads once the backend has finished its own aggregation pass.
    #[serde(default)]
    pub watch: Option<WatchHighlights>,

    /// Live session detail from the secondary slow source. Nulled when that
    /// fetch fails; the rest of the snapshot still displays.
    #[serde(default)]
    pub live: Option<LiveDetailSnapshot>,
}

impl StatsSnapshot {
    /// Combined stream count across Plex sessions and IPTV connections.
    pub fn total_active_streams(&self) -> u64 {
        let plex: u64 = self.plex_servers
            .iter()
            .map(|s| s.active_sessions)
            .sum();
        let iptv: u64 = self.iptv_panels
            .iter()
            .map(|p| p.active_connections)
            .sum();
        plex + iptv
    }
}

/// Per-Plex-server resource and session counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub name: String,

    #[serde(default)]
    pub online: bool,

    #[serde(default)]
    pub active_sessions: u64,

    #[serde(default)]
    pub transcoding_sessions: u64,

    #[serde(default)]
    pub direct_play_sessions: u64,

    #[serde(default)]
    pub cpu_usage_percent: f64,

    #[serde(default)]
    pub memory_usage_percent: f64,

    #[serde(default)]
    pub library_count: u64,

    #[serde(default)]
    pub total_media_items: u64,
}

/// Per-IPTV-panel connection counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub name: String,

    #[serde(default)]
    pub online: bool,

    #[serde(default)]
    pub active_connections: u64,

    #[serde(default)]
    pub max_connections: u64,
}

/// Top watched/popular content and most active users over the last 30 days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchHighlights {
    #[serde(default)]
    pub most_watched_movies: Vec<WatchedItem>,

    #[serde(default)]
    pub most_watched_shows: Vec<WatchedItem>,

    #[serde(default)]
    pub most_active_users: Vec<ActiveUser>,

    #[serde(default)]
    pub most_active_platforms: Vec<ActivePlatform>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchedItem {
    pub title: String,

    #[serde(default)]
    pub year: Option<u32>,

    #[serde(default)]
    pub play_count: u64,

    #[serde(default)]
    pub unique_users: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveUser {
    pub username: String,

    #[serde(default)]
    pub play_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivePlatform {
    pub platform: String,

    #[serde(default)]
    pub play_count: u64,
}

/// Live session detail, fetched separately because it hits every Plex server
/// and IPTV panel directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveDetailSnapshot {
    #[serde(default)]
    pub sessions: Vec<LiveSession>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveSession {
    pub username: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub player: String,

    #[serde(default)]
    pub transcoding: bool,
}

/// Full-stats response envelope. `refreshing` signals that the backend is
/// still computing fresher data in the background and polling should begin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullStatsEnvelope {
    pub stats: StatsSnapshot,

    #[serde(default)]
    pub cached: bool,

    #[serde(default)]
    pub refreshing: bool,

    #[serde(default)]
    pub cache_age_seconds: Option<u64>,
}

/// Identifier for a stat card or dashboard section.
pub type ItemId = String;

/// Display order and visibility for one group of dashboard items.
///
/// `order` is a superset of every known id; `hidden` is always a subset of
/// `order`. New ids are appended, never inserted, so user-chosen relative
/// positions survive upgrades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSet {
    #[serde(default)]
    pub order: Vec<ItemId>,

    #[serde(default)]
    pub hidden: HashSet<ItemId>,
}

impl PreferenceSet {
    pub fn from_order(order: &[&str]) -> Self {
        Self {
            order: order
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hidden: HashSet::new(),
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }
}

/// Card and section preferences for one user's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceBundle {
    #[serde(default)]
    pub cards: PreferenceSet,

    #[serde(default)]
    pub sections: PreferenceSet,
}

impl PreferenceBundle {
    /// Built-in order used for first-run users and as the append source for
    /// ids a saved order has never seen.
    pub fn defaults() -> Self {
        Self {
            cards: PreferenceSet::from_order(super::constants::DEFAULT_CARD_ORDER),
            sections: PreferenceSet::from_order(super::constants::DEFAULT_SECTION_ORDER),
        }
    }
}
