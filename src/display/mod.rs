//! Presentation boundary and expanded-region tracking
//!
//! The dashboard never renders anything itself; it hands data to a
//! [`PresentationAdapter`] and keeps re-renders visually non-disruptive by
//! snapshotting which collapsible regions are open before each display
//! callback and restoring them afterwards.

pub mod console;

use crate::core::StatsSnapshot;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Identifier for a collapsible dashboard region.
///
/// Fixed sections use stable names ("plex-servers"). Per-panel regions are
/// keyed by render position ("panel-0", "panel-1"): if the panel count
/// changes between renders, open state can attach to a different panel. See
/// the tracker tests for the documented behavior.
pub type RegionId = String;

/// Region id for the panel at a render position.
pub fn panel_region(index: usize) -> RegionId {
    format!("panel-{}", index)
}

/// Region id for the server at a render position.
pub fn server_region(index: usize) -> RegionId {
    format!("server-{}", index)
}

/// Set of regions currently expanded.
pub type ExpandedRegionSet = HashSet<RegionId>;

/// Everything the dashboard pushes out to whatever is rendering it.
pub trait PresentationAdapter: Send + Sync {
    /// New or cached data is ready to render. `is_cached` distinguishes a
    /// tier-served snapshot from a fresh fetch.
    fn on_display(&self, stats: &StatsSnapshot, is_cached: bool);

    /// Loading indicators on/off. Every refresh ends with `false`, including
    /// failures and abandoned loads, so indicators can never stick.
    fn on_loading_state_change(&self, active: bool);

    /// A visible load failed and nothing fresher could be shown. The adapter
    /// should render the message with a manual retry affordance.
    fn on_display_error(&self, message: &str);
}

/// Records which collapsible regions are open so a re-render can put the
/// dashboard back the way the user left it.
#[derive(Debug, Default)]
pub struct DisplayStateTracker {
    open: Mutex<ExpandedRegionSet>,
}

impl DisplayStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// User toggled a region.
    pub fn set_region_open(&self, id: &str, open: bool) {
        let mut set = self.open.lock();
        if open {
            set.insert(id.to_string());
        } else {
            set.remove(id);
        }
    }

    pub fn is_region_open(&self, id: &str) -> bool {
        self.open.lock().contains(id)
    }

    /// Snapshot the open regions. Called immediately before any destructive
    /// re-render.
    pub fn capture_open_regions(&self) -> ExpandedRegionSet {
        self.open.lock().clone()
    }

    /// Re-open previously-open regions after a re-render. Ids that did not
    /// exist in the previous render pass are carried over too, so a region
    /// that only appears in the new render starts open if its id matches.
    pub fn restore_open_regions(&self, set: &ExpandedRegionSet) {
        let mut open = self.open.lock();
        for id in set {
            open.insert(id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_restore_round_trip() {
        let tracker = DisplayStateTracker::new();
        tracker.set_region_open("plex-servers", true);
        tracker.set_region_open("live-streams", true);
        tracker.set_region_open("live-streams", false);

        let snapshot = tracker.capture_open_regions();
        assert!(snapshot.contains("plex-servers"));
        assert!(!snapshot.contains("live-streams"));

        tracker.restore_open_regions(&snapshot);
        assert!(tracker.is_region_open("plex-servers"));
    }

    #[test]
    fn test_restore_accepts_unknown_region_ids() {
        let tracker = DisplayStateTracker::new();

        // A region that never existed before this render pass
        let mut snapshot = ExpandedRegionSet::new();
        snapshot.insert(panel_region(3));
        tracker.restore_open_regions(&snapshot);

        assert!(tracker.is_region_open("panel-3"));
    }

    // Panel regions are keyed by render position, not by a stable panel id.
    // When the panel count changes between renders the open flag stays with
    // the position, so it can land on a different panel. Keyed-by-panel-id
    // regions would fix this; kept as-is because saved open state from
    // existing deployments uses positional keys.
    #[test]
    fn test_positional_region_ids_shift_when_panel_count_changes() {
        let tracker = DisplayStateTracker::new();

        // Render 1: panels [A, B, C]; user expands B (position 1)
        tracker.set_region_open(&panel_region(1), true);
        let snapshot = tracker.capture_open_regions();

        // Render 2: panel A was removed, panels are now [B, C]. Position 1
        // is panel C, so the restored open flag attaches to C, not B.
        tracker.restore_open_regions(&snapshot);
        assert!(tracker.is_region_open(&panel_region(1)));
        assert!(!tracker.is_region_open(&panel_region(0)));
    }
}
