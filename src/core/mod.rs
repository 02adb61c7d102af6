pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::DashboardConfig;
pub use error::{ DashError, DashResult };
pub use types::{
    ActivePlatform,
    ActiveUser,
    CacheEntry,
    FullStatsEnvelope,
    ItemId,
    LiveDetailSnapshot,
    LiveSession,
    PanelSnapshot,
    PreferenceBundle,
    PreferenceSet,
    ServerSnapshot,
    StatsSnapshot,
    WatchHighlights,
    WatchedItem,
};
