//! Refresh coordination for one dashboard session
//!
//! Owns the state machine that sequences quick loads, full loads and the
//! bounded background-poll protocol, plus the single-flight guard that keeps
//! them from overlapping. All shared state lives on the coordinator instance;
//! nothing here is a process global, so multiple dashboard sessions can
//! coexist and tests run deterministically.
//!
//! Concurrency contract:
//! - the single-flight boolean is taken before the first await in every load
//!   path and released on every exit path;
//! - a refresh request arriving while one is in flight is dropped (never
//!   queued) and reported as skipped;
//! - every load captures the generation counter at start and re-checks it
//!   before each cache write or display callback, so a load that outlives its
//!   session (unmount) or is superseded discards itself;
//! - every transition back to idle clears the loading indicators, including
//!   failure, drop and poll-give-up paths.

pub mod session;
pub mod state;


use crate::api::StatsApi;
use crate::cache::TieredCache;
use crate::core::{ DashboardConfig, FullStatsEnvelope, LiveDetailSnapshot, StatsSnapshot };
use crate::display::{ DisplayStateTracker, PresentationAdapter };
use crate::logger::{ self, LogTag };
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, AtomicU64, Ordering };
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

pub use session::DashboardSession;
pub use state::{ RefreshOutcome, RefreshState };

/// Waits for a delay or a shutdown signal, whichever comes first.
/// Returns true if shutdown was signaled.
async fn check_shutdown_or_delay(shutdown: &Notify, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.notified() => true,
    }
}

pub struct RefreshCoordinator {
    api: Arc<dyn StatsApi>,
    cache: Arc<TieredCache>,
    tracker: Arc<DisplayStateTracker>,
    adapter: Arc<dyn PresentationAdapter>,
    config: DashboardConfig,

    state: Mutex<RefreshState>,
    /// Single-flight guard. True from the start of any load until the state
    /// machine returns to idle.
    is_refreshing: AtomicBool,
    /// Generation sentinel. Bumped when a load is accepted and on unmount;
    /// a load whose captured generation no longer matches discards itself.
    generation: AtomicU64,
    mounted: AtomicBool,
    shutdown: Notify,
}

impl RefreshCoordinator {
    pub fn new(
        api: Arc<dyn StatsApi>,
        cache: Arc<TieredCache>,
        tracker: Arc<DisplayStateTracker>,
        adapter: Arc<dyn PresentationAdapter>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            api,
            cache,
            tracker,
            adapter,
            config,
            state: Mutex::new(RefreshState::Idle),
            is_refreshing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(false),
            shutdown: Notify::new(),
        }
    }

    pub fn state(&self) -> RefreshState {
        *self.state.lock()
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing.load(Ordering::SeqCst)
    }

    pub fn set_mounted(&self) {
        self.mounted.store(true, Ordering::SeqCst);
    }

    /// Abandon anything in flight. In-flight fetches are not aborted; their
    /// eventual resolution sees a stale generation and becomes a no-op.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    // =========================================================================
    // LOAD PATHS
    // =========================================================================

    /// Database-only statistics load. Writes the ephemeral and persistent
    /// tiers and displays the result; independent of the full load.
    pub async fn quick_load(&self) -> RefreshOutcome {
        let Some(gen) = self.try_begin(RefreshState::QuickLoading, false) else {
            logger::debug(LogTag::Dashboard, "Quick load dropped, refresh already in flight");
            return RefreshOutcome::Skipped;
        };

        let outcome = self.quick_load_inner(gen).await;
        self.finish();
        outcome
    }

    async fn quick_load_inner(&self, gen: u64) -> RefreshOutcome {
        let result = match self.api.fetch_quick_stats().await {
            Err(e) if e.is_not_ready() => {
                logger::info(LogTag::Dashboard, "Stats backend not ready, retrying quick load once");
                tokio::time::sleep(self.config.not_ready_retry_delay).await;
                self.api.fetch_quick_stats().await
            }
            other => other,
        };

        match result {
            Ok(stats) => {
                if !self.is_current(gen) {
                    return RefreshOutcome::Abandoned;
                }
                self.cache.write_ephemeral(&stats);
                self.cache.write_persistent(&stats);
                self.display(&stats, false);
                logger::info(LogTag::Dashboard, "Quick stats loaded");
                RefreshOutcome::Completed
            }
            Err(e) if e.is_not_ready() => {
                logger::info(LogTag::Dashboard, "Stats backend still not ready, giving up quietly");
                RefreshOutcome::Failed
            }
            Err(e) => {
                logger::warning(LogTag::Dashboard, &format!("Quick stats load failed: {}", e));
                if !self.is_current(gen) {
                    return RefreshOutcome::Abandoned;
                }
                // Placeholder only when there is truly nothing to show; a
                // cached render from mount already covers the other case.
                if self.cache.read_ephemeral().is_none() && self.cache.read_persistent().is_none() {
                    self.adapter.on_display_error(&format!("Failed to load statistics: {}", e));
                }
                RefreshOutcome::Failed
            }
        }
    }

    /// Full authoritative load. `force` bypasses the backend's response
    /// cache; `silent` suppresses loading indicators and error display (used
    /// by the auto-refresh timer).
    pub async fn refresh(&self, force: bool, silent: bool) -> RefreshOutcome {
        let Some(gen) = self.try_begin(RefreshState::FullLoading, silent) else {
            logger::debug(LogTag::Dashboard, "Refresh request dropped, another refresh is in flight");
            return RefreshOutcome::Skipped;
        };

        let outcome = self.full_load(gen, force, silent).await;
        self.finish();
        outcome
    }

    async fn full_load(&self, gen: u64, force: bool, silent: bool) -> RefreshOutcome {
        let result = match self.api.fetch_full_stats(force).await {
            Err(e) if e.is_not_ready() => {
                logger::info(LogTag::Dashboard, "Stats backend not ready, retrying full load once");
                tokio::time::sleep(self.config.not_ready_retry_delay).await;
                self.api.fetch_full_stats(force).await
            }
            other => other,
        };

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(e) if e.is_not_ready() => {
                logger::info(LogTag::Dashboard, "Stats backend still not ready, giving up quietly");
                return RefreshOutcome::Failed;
            }
            Err(e) => {
                logger::warning(LogTag::Dashboard, &format!("Full stats load failed: {}", e));
                if !self.is_current(gen) {
                    return RefreshOutcome::Abandoned;
                }
                if !silent {
                    self.adapter.on_display_error(&format!("Failed to refresh statistics: {}", e));
                }
                return RefreshOutcome::Failed;
            }
        };

        // Secondary slow source: its failure nulls the field, never the load
        let live = self.fetch_live_or_none().await;

        if !self.is_current(gen) {
            return RefreshOutcome::Abandoned;
        }
        self.apply_full(envelope.stats.clone(), live, envelope.cached);

        if envelope.refreshing {
            *self.state.lock() = RefreshState::BackgroundPolling;
            logger::info(LogTag::Dashboard, "Backend still refreshing, polling for fresh stats");

            if let Some(settled) = self.poll_until_settled(gen).await {
                let live = self.fetch_live_or_none().await;
                if !self.is_current(gen) {
                    return RefreshOutcome::Abandoned;
                }
                self.apply_full(settled.stats, live, settled.cached);
                logger::info(LogTag::Dashboard, "Fresh stats arrived from background refresh");
            } else if !self.is_current(gen) {
                return RefreshOutcome::Abandoned;
            }
        }

        RefreshOutcome::Completed
    }

    /// Re-fetch primary stats on a fixed interval until the backend reports
    /// `refreshing: false`, the attempt cap is reached, or shutdown. Poll
    /// failures are retried (they consume an attempt) and never surfaced.
    async fn poll_until_settled(&self, gen: u64) -> Option<FullStatsEnvelope> {
        for attempt in 1..=self.config.max_poll_attempts {
            if check_shutdown_or_delay(&self.shutdown, self.config.poll_interval).await {
                return None;
            }
            if !self.is_current(gen) {
                return None;
            }

            match self.api.fetch_full_stats(false).await {
                Ok(envelope) if !envelope.refreshing => {
                    logger::debug(
                        LogTag::Dashboard,
                        &format!("Backend refresh settled after {} poll(s)", attempt)
                    );
                    return Some(envelope);
                }
                Ok(_) => {
                    logger::verbose(
                        LogTag::Dashboard,
                        &format!("Poll {}/{}: backend still refreshing", attempt, self.config.max_poll_attempts)
                    );
                }
                Err(e) => {
                    logger::debug(
                        LogTag::Dashboard,
                        &format!("Poll {}/{} failed: {}", attempt, self.config.max_poll_attempts, e)
                    );
                }
            }
        }

        logger::info(
            LogTag::Dashboard,
            &format!("Gave up waiting for backend refresh after {} polls", self.config.max_poll_attempts)
        );
        None
    }

    /// Serve the freshest cached snapshot without any network traffic.
    /// Ephemeral first (same-process remount), then session, then the
    /// persistent last-known-good. Returns whether anything was displayed.
    pub fn display_cached(&self) -> bool {
        if let Some(stats) = self.cache.read_ephemeral() {
            self.display(&stats, true);
            return true;
        }
        if let Some((stats, age)) = self.cache.read_session() {
            logger::debug(LogTag::Cache, &format!("Serving session cache (age {}s)", age));
            self.display(&stats, true);
            return true;
        }
        if let Some(stats) = self.cache.read_persistent() {
            logger::debug(LogTag::Cache, "Serving persistent last-known-good stats");
            self.display(&stats, true);
            return true;
        }
        false
    }

    // =========================================================================
    // AUTO-REFRESH TIMER
    // =========================================================================

    /// Recurring silent full load while the dashboard is mounted. Races with
    /// manual refreshes are resolved by the single-flight guard: the losing
    /// request is dropped, not queued.
    pub fn start_auto_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let stopped = check_shutdown_or_delay(
                    &coordinator.shutdown,
                    coordinator.config.auto_refresh_period
                ).await;
                if stopped || !coordinator.mounted.load(Ordering::SeqCst) {
                    logger::debug(LogTag::Dashboard, "Auto-refresh timer stopped");
                    break;
                }

                match coordinator.refresh(false, true).await {
                    RefreshOutcome::Skipped => {
                        logger::debug(LogTag::Dashboard, "Auto-refresh skipped, refresh already in flight");
                    }
                    RefreshOutcome::Failed => {
                        // Swallowed; the next tick retries
                        logger::debug(LogTag::Dashboard, "Auto-refresh failed, will retry next tick");
                    }
                    _ => {}
                }
            }
        })
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Take the single-flight guard and enter `state`. Returns the captured
    /// generation, or `None` when another refresh holds the guard. Runs
    /// entirely before the first suspension point of the load.
    fn try_begin(&self, state: RefreshState, silent: bool) -> Option<u64> {
        if
            self.is_refreshing
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            return None;
        }

        let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.lock() = state;
        if !silent {
            self.adapter.on_loading_state_change(true);
        }
        Some(gen)
    }

    /// Return to idle. Runs on every exit path, so indicators can never be
    /// left active regardless of how the load ended.
    fn finish(&self) {
        *self.state.lock() = RefreshState::Idle;
        self.is_refreshing.store(false, Ordering::SeqCst);
        self.adapter.on_loading_state_change(false);
    }

    fn is_current(&self, gen: u64) -> bool {
        self.mounted.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == gen
    }

    async fn fetch_live_or_none(&self) -> Option<LiveDetailSnapshot> {
        match self.api.fetch_live_detail().await {
            Ok(live) => Some(live),
            Err(e) => {
                logger::warning(
                    LogTag::Api,
                    &format!("Live detail fetch failed, showing stats without it: {}", e)
                );
                None
            }
        }
    }

    /// Populate all tiers from a successful full fetch and display.
    fn apply_full(&self, mut stats: StatsSnapshot, live: Option<LiveDetailSnapshot>, cached: bool) {
        stats.live = live;
        self.cache.write_ephemeral(&stats);
        self.cache.write_session(&stats);
        self.cache.write_persistent(&stats);
        self.display(&stats, cached);
    }

    /// Display callback wrapped in an open-region snapshot/restore so the
    /// re-render is visually non-disruptive.
    fn display(&self, stats: &StatsSnapshot, is_cached: bool) {
        let open = self.tracker.capture_open_regions();
        self.adapter.on_display(stats, is_cached);
        self.tracker.restore_open_regions(&open);
    }
}
