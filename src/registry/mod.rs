//! Display Registry
//!
//! The set of currently tracked display windows and, for each, the settings
//! linkers attached to it. Entries are kept in registration order and linker
//! sets in attach order, so every traversal the group manager performs is
//! deterministic and reproducible under test.

use crate::display::{DisplayId, DisplayWindow};
use crate::link::{LinkerToken, SettingsLinker};
use std::sync::Arc;
use tracing::debug;

/// One tracked window together with its attached linkers
pub struct DisplayEntry {
    /// The tracked window.
    pub window: Arc<dyn DisplayWindow>,

    /// Linkers attached to this window, in attach order.
    pub linkers: Vec<Arc<dyn SettingsLinker>>,
}

/// Registry of tracked display windows
///
/// Exclusively owned and mutated by the group manager. A window appears at
/// most once, and a linker appears in at most one window's set.
#[derive(Default)]
pub struct DisplayRegistry {
    entries: Vec<DisplayEntry>,
}

impl DisplayRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked windows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no window is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `id` names a tracked window.
    pub fn contains(&self, id: DisplayId) -> bool {
        self.entries.iter().any(|e| e.window.id() == id)
    }

    /// Start tracking `window` with an empty linker set.
    ///
    /// Returns false (and leaves the registry untouched) if the window is
    /// already tracked.
    pub fn register(&mut self, window: Arc<dyn DisplayWindow>) -> bool {
        if self.contains(window.id()) {
            return false;
        }
        debug!(display = %window.id(), "display registered");
        self.entries.push(DisplayEntry {
            window,
            linkers: Vec::new(),
        });
        true
    }

    /// Stop tracking `id`, returning its entry.
    ///
    /// Returns `None` when the window was never tracked; callers treat that
    /// as a no-op so teardown stays idempotent.
    pub fn remove(&mut self, id: DisplayId) -> Option<DisplayEntry> {
        let idx = self.entries.iter().position(|e| e.window.id() == id)?;
        debug!(display = %id, "display removed from registry");
        Some(self.entries.remove(idx))
    }

    /// Attach `linker` to the tracked window `id`.
    ///
    /// Returns false when the window is not tracked.
    pub fn attach_linker(&mut self, id: DisplayId, linker: Arc<dyn SettingsLinker>) -> bool {
        match self.entries.iter_mut().find(|e| e.window.id() == id) {
            Some(entry) => {
                entry.linkers.push(linker);
                true
            }
            None => false,
        }
    }

    /// Detach the linker with `token` from window `id`, if both exist.
    ///
    /// Tolerant of a missing window entry: detaching may run after the
    /// window's own teardown already removed it.
    pub fn detach_linker(&mut self, id: DisplayId, token: LinkerToken) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.window.id() == id) {
            entry.linkers.retain(|l| l.token() != token);
        }
    }

    /// Linkers attached to window `id`, in attach order.
    pub fn linkers(&self, id: DisplayId) -> Option<&[Arc<dyn SettingsLinker>]> {
        self.entries
            .iter()
            .find(|e| e.window.id() == id)
            .map(|e| e.linkers.as_slice())
    }

    /// The tracked window named `id`.
    pub fn window(&self, id: DisplayId) -> Option<&Arc<dyn DisplayWindow>> {
        self.entries
            .iter()
            .find(|e| e.window.id() == id)
            .map(|e| &e.window)
    }

    /// All tracked windows, in registration order.
    pub fn windows(&self) -> impl Iterator<Item = &Arc<dyn DisplayWindow>> {
        self.entries.iter().map(|e| &e.window)
    }

    /// Every linker across every tracked window, tagged with its window, in
    /// registration-then-attach order.
    pub fn all_linkers(&self) -> impl Iterator<Item = (DisplayId, &Arc<dyn SettingsLinker>)> {
        self.entries
            .iter()
            .flat_map(|e| e.linkers.iter().map(move |l| (e.window.id(), l)))
    }
}
