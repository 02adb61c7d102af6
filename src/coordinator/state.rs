/// Refresh state machine vocabulary.
///
/// One dashboard session is in exactly one of these states. Only the
/// coordinator mutates it, and the single-flight guard guarantees no two
/// non-idle states ever overlap.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Nothing in flight. Loading indicators are always off here.
    Idle,
    /// Database-only stats fetch, attempted at mount before any full load.
    QuickLoading,
    /// Full authoritative fetch, possibly with a secondary live-detail fetch.
    FullLoading,
    /// Bounded re-polling while the backend computes fresher data.
    BackgroundPolling,
}

impl RefreshState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RefreshState::Idle)
    }
}

impl std::fmt::Display for RefreshState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RefreshState::Idle => "idle",
            RefreshState::QuickLoading => "quick-loading",
            RefreshState::FullLoading => "full-loading",
            RefreshState::BackgroundPolling => "background-polling",
        };
        write!(f, "{}", s)
    }
}

/// How a refresh request ended, reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Data was fetched and displayed (a silent poll give-up still counts:
    /// the initial full-load data was displayed).
    Completed,
    /// Dropped by the single-flight guard; another refresh was in flight.
    Skipped,
    /// The fetch failed; recovery behavior depends on visibility.
    Failed,
    /// The session was unmounted or superseded while the request was in
    /// flight; its result was discarded without touching cache or display.
    Abandoned,
}
