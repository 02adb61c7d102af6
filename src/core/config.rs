/// Timing configuration for a dashboard session.
///
/// Defaults match production behavior (5 minute session TTL, 1s polls capped
/// at 30 attempts, 30s auto-refresh). Tests compress these to milliseconds so
/// the full poll protocol runs in-process without wall-clock waits.

use super::constants;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Session tier entries older than this are treated as absent.
    pub session_ttl: Duration,

    /// Delay between background poll attempts.
    pub poll_interval: Duration,

    /// Maximum background poll attempts before giving up silently.
    pub max_poll_attempts: u32,

    /// Period of the silent auto-refresh timer.
    pub auto_refresh_period: Duration,

    /// Delay before the single "not ready yet" retry.
    pub not_ready_retry_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(constants::SESSION_CACHE_TTL_SECS),
            poll_interval: Duration::from_millis(constants::POLL_INTERVAL_MS),
            max_poll_attempts: constants::MAX_POLL_ATTEMPTS,
            auto_refresh_period: Duration::from_secs(constants::AUTO_REFRESH_PERIOD_SECS),
            not_ready_retry_delay: Duration::from_millis(constants::NOT_READY_RETRY_DELAY_MS),
        }
    }
}

impl DashboardConfig {
    /// Custom configuration (used by tests to compress the poll protocol).
    pub fn custom(
        session_ttl: Duration,
        poll_interval: Duration,
        max_poll_attempts: u32,
        auto_refresh_period: Duration,
        not_ready_retry_delay: Duration,
    ) -> Self {
        Self {
            session_ttl,
            poll_interval,
            max_poll_attempts,
            auto_refresh_period,
            not_ready_retry_delay,
        }
    }

    /// Millisecond-scale timings with the production attempt cap. Keeps poll
    /// cap semantics testable without a 30 second wait.
    pub fn compressed() -> Self {
        Self {
            session_ttl: Duration::from_secs(constants::SESSION_CACHE_TTL_SECS),
            poll_interval: Duration::from_millis(1),
            max_poll_attempts: constants::MAX_POLL_ATTEMPTS,
            auto_refresh_period: Duration::from_secs(3600),
            not_ready_retry_delay: Duration::from_millis(1),
        }
    }
}
