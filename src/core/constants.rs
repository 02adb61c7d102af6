/// Numeric tunables and storage keys for the dashboard refresh pipeline.
///
/// Everything timing-related here feeds `DashboardConfig::default()`; tests
/// build compressed configs instead of patching these.

/// Session tier entries older than this are discarded on read.
pub const SESSION_CACHE_TTL_SECS: u64 = 300;

/// Delay between background poll attempts while the backend is still
/// computing fresher stats.
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Hard cap on background poll attempts before giving up silently.
pub const MAX_POLL_ATTEMPTS: u32 = 30;

/// Period of the silent auto-refresh timer while a dashboard is mounted.
pub const AUTO_REFRESH_PERIOD_SECS: u64 = 30;

/// Delay before the single retry when the backend reports "not ready yet".
pub const NOT_READY_RETRY_DELAY_MS: u64 = 1000;

/// HTTP timeout for panel API requests.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// STORAGE KEYS
// Tier storage is string-keyed JSON blobs; keys are shared between the cache
// tiers and the preference store so they never collide.
// =============================================================================

/// Persistent tier: last-known-good stats, survives restarts.
pub const STATS_PERSISTENT_KEY: &str = "dashboard.stats";

/// Session tier: stats valid for the lifetime of one dashboard session.
pub const STATS_SESSION_KEY: &str = "dashboard.stats.session";

/// Persistent card/section display preferences.
pub const PREFS_KEY: &str = "dashboard.prefs";

// =============================================================================
// DEFAULT DISPLAY PREFERENCES
// New ids introduced by a build are appended to a user's saved order, so the
// order here only matters for first-run users.
// =============================================================================

/// Default stat card order for a fresh install.
pub const DEFAULT_CARD_ORDER: &[&str] = &[
    "total-users",
    "active-subscriptions",
    "expiring-soon",
    "monthly-revenue",
    "plex-streams",
    "iptv-connections",
];

/// Default dashboard section order for a fresh install.
pub const DEFAULT_SECTION_ORDER: &[&str] = &[
    "overview",
    "plex-servers",
    "iptv-panels",
    "live-streams",
    "watch-highlights",
];
