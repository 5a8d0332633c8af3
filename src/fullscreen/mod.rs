//! Fullscreen Coordinator
//!
//! Tracks which display window, if any, owns exclusive fullscreen
//! presentation on each monitor, and recomputes the visibility of every
//! other tracked window whenever fullscreen is toggled anywhere.
//!
//! A window that is fullscreen on monitor M must never be hidden because a
//! different window went fullscreen on monitor N: visibility changes apply
//! only to non-fullscreen windows whose monitor is claimed by some
//! fullscreen owner.

use crate::display::{DisplayId, DisplayWindow, MonitorId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-monitor fullscreen ownership and visibility policy
///
/// Exclusively owned and mutated by the group manager. The ownership map
/// holds at most one owner per monitor; no entry means no window is
/// fullscreen there.
#[derive(Default)]
pub struct FullscreenCoordinator {
    owners: BTreeMap<MonitorId, DisplayId>,
}

impl FullscreenCoordinator {
    /// Create a coordinator with no fullscreen owners.
    pub fn new() -> Self {
        Self::default()
    }

    /// The window currently fullscreen on `monitor`, if any.
    pub fn owner(&self, monitor: MonitorId) -> Option<DisplayId> {
        self.owners.get(&monitor).copied()
    }

    /// Handle a fullscreen toggle from `source` and recompute visibility of
    /// every tracked window.
    ///
    /// Entering records `source` as the owner of `monitor`. Exiting clears
    /// the ownership entry, but only when `source` is the recorded owner, so
    /// a stale exit notification cannot evict a different window's claim.
    /// Either way, the visibility pass then runs over `tracked`:
    /// fullscreen owners are skipped (they manage their own visibility),
    /// everything else is shown unless its monitor is claimed by an owner.
    pub fn handle_toggle<'a>(
        &mut self,
        source: DisplayId,
        entering: bool,
        monitor: MonitorId,
        tracked: impl Iterator<Item = &'a Arc<dyn DisplayWindow>>,
    ) {
        if entering {
            info!(display = %source, %monitor, "display entered fullscreen");
            self.owners.insert(monitor, source);
        } else if self.owner(monitor) == Some(source) {
            info!(display = %source, %monitor, "display exited fullscreen");
            self.owners.remove(&monitor);
        } else {
            debug!(display = %source, %monitor, "fullscreen exit from non-owner ignored");
        }

        // Monitors claimed by a fullscreen owner admit no other visible window.
        let banned: BTreeSet<MonitorId> = self.owners.keys().copied().collect();
        // Owners manage their own visibility and must not be touched.
        let skip: BTreeSet<DisplayId> = self.owners.values().copied().collect();

        for window in tracked {
            if skip.contains(&window.id()) {
                continue;
            }
            window.set_visible(!banned.contains(&window.monitor()));
        }
    }

    /// Drop any ownership entry naming `display`, without touching
    /// visibility. Runs as part of window teardown.
    pub fn forget_display(&mut self, display: DisplayId) {
        // Collect first: removal during map traversal is a hazard.
        let monitors: Vec<MonitorId> = self
            .owners
            .iter()
            .filter(|(_, owner)| **owner == display)
            .map(|(monitor, _)| *monitor)
            .collect();
        for monitor in monitors {
            let display_id = display;
            debug!(display = %display_id, %monitor, "fullscreen ownership dropped on teardown");
            self.owners.remove(&monitor);
        }
    }
}
