//! Collaborator contracts consumed by the refresh pipeline
//!
//! The panel backend implements stats aggregation and preference persistence
//! elsewhere; the dashboard consumes them only through these traits. The
//! shipped implementation is [`http::HttpPanelClient`]; tests script their
//! own implementations.

pub mod http;

use crate::core::{ DashResult, FullStatsEnvelope, LiveDetailSnapshot, PreferenceBundle, StatsSnapshot };
use async_trait::async_trait;

/// Statistics endpoints of the panel backend.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Database-only statistics. No slow external calls downstream, so this
    /// resolves fast and is always attempted before the full load.
    async fn fetch_quick_stats(&self) -> DashResult<StatsSnapshot>;

    /// Full statistics from the authoritative source. `force` bypasses the
    /// backend's own response cache.
    async fn fetch_full_stats(&self, force: bool) -> DashResult<FullStatsEnvelope>;

    /// Live session detail. Hits every Plex server and IPTV panel, so it is
    /// fetched separately and may fail independently of the primary stats.
    async fn fetch_live_detail(&self) -> DashResult<LiveDetailSnapshot>;
}

/// Preference endpoints of the panel backend.
#[async_trait]
pub trait PreferencesApi: Send + Sync {
    /// The user's saved preferences, or `None` when nothing was ever saved.
    async fn fetch_preferences(&self) -> DashResult<Option<PreferenceBundle>>;

    async fn save_preferences(&self, bundle: &PreferenceBundle) -> DashResult<()>;
}
