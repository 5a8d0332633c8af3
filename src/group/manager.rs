//! Group Manager
//!
//! Synchronous core of the crate: owns the registry, the linker graph, and
//! the fullscreen coordinator, dispatches every notification to exactly one
//! handler, and contains all error handling. No handler blocks, suspends, or
//! spawns work; callers are expected to serialize notifications (the group
//! runtime does).

use crate::display::{DisplayId, DisplayWindow, MonitorId, SettingsDelta};
use crate::fullscreen::FullscreenCoordinator;
use crate::group::{SessionEvent, WindowAdapter, WindowEvent};
use crate::link::SettingsLinker;
use crate::registry::DisplayRegistry;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Coordinator for a session's group of display windows
///
/// Created once per session and torn down with it. All state is exclusively
/// owned; collaborators are only ever called, never shared mutably.
pub struct GroupManager {
    registry: DisplayRegistry,
    fullscreen: FullscreenCoordinator,
    adapters: Vec<WindowAdapter>,
    queue: mpsc::WeakSender<SessionEvent>,
}

impl GroupManager {
    /// Create a manager whose window adapters forward into `queue`.
    ///
    /// [`crate::group::GroupRuntime`] is the usual construction path; build
    /// a manager directly only when the host already serializes
    /// notifications on its own event thread.
    pub fn new(queue: mpsc::WeakSender<SessionEvent>) -> Self {
        Self {
            registry: DisplayRegistry::new(),
            fullscreen: FullscreenCoordinator::new(),
            adapters: Vec::new(),
            queue,
        }
    }

    /// Read access to the display registry.
    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    /// Read access to the fullscreen coordinator.
    pub fn coordinator(&self) -> &FullscreenCoordinator {
        &self.fullscreen
    }

    /// The event adapter bound to window `id`, if it is tracked.
    pub fn adapter(&self, id: DisplayId) -> Option<WindowAdapter> {
        self.adapters.iter().find(|a| a.source() == id).cloned()
    }

    /// Route one session-scoped notification to its handler.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::DisplayCreated(window) => self.register(window),
            SessionEvent::Window { source, event } => self.handle_window_event(source, event),
        }
    }

    /// Route one window-scoped notification to its handler.
    pub fn handle_window_event(&mut self, source: DisplayId, event: WindowEvent) {
        match event {
            WindowEvent::SettingsChanged(delta) => self.propagate_settings(source, &delta),
            WindowEvent::LinkerCreated(linker) => self.attach_linker(source, linker),
            WindowEvent::LinkerRemoved(linker) => self.detach_linker(source, &linker),
            WindowEvent::FullscreenToggled { entering, monitor } => {
                self.fullscreen_toggled(source, entering, monitor)
            }
            WindowEvent::Destroyed => self.unregister(source),
        }
    }

    /// Start tracking a new display window: empty linker set plus an event
    /// adapter bound to the window's event stream.
    ///
    /// Registering an already-tracked window is a bug in the surrounding
    /// lifecycle management; it asserts in debug builds and is refused with
    /// a warning in release builds.
    pub fn register(&mut self, window: Arc<dyn DisplayWindow>) {
        let id = window.id();
        debug_assert!(
            !self.registry.contains(id),
            "display {id} registered twice"
        );
        if !self.registry.register(window.clone()) {
            warn!(display = %id, "duplicate display registration refused");
            return;
        }
        let adapter = WindowAdapter::new(id, self.queue.clone());
        self.adapters.push(adapter.clone());
        window.attach_events(adapter);
        info!(display = %id, tracked = self.registry.len(), "display joined group");
    }

    /// Stop tracking `source`: unlink every linker still attached to it,
    /// then drop its registry entry, its adapter, and any fullscreen
    /// ownership it held. A destroy notification for an untracked window is
    /// a no-op.
    fn unregister(&mut self, source: DisplayId) {
        let Some(entry) = self.registry.remove(source) else {
            debug!(display = %source, "destroy notification for untracked display ignored");
            return;
        };
        for linker in &entry.linkers {
            linker.unlink_all();
        }
        self.fullscreen.forget_display(source);
        self.adapters.retain(|a| a.source() != source);
        info!(display = %source, tracked = self.registry.len(), "display left group");
    }

    /// Attach a newly created linker to `source` and link it to every
    /// tracked linker that shares its logical identity.
    ///
    /// When several windows already carry the identity, the new linker is
    /// linked to each of them individually, producing a fully connected
    /// link set rather than a chain.
    fn attach_linker(&mut self, source: DisplayId, linker: Arc<dyn SettingsLinker>) {
        debug_assert!(
            self.registry.contains(source),
            "linker attached to untracked display {source}"
        );
        if !self.registry.contains(source) {
            warn!(display = %source, "linker for untracked display refused");
            return;
        }

        // Snapshot matching peers before mutating the registry.
        let peers: Vec<Arc<dyn SettingsLinker>> = self
            .registry
            .all_linkers()
            .filter(|(_, peer)| {
                peer.link_id() == linker.link_id() && peer.token() != linker.token()
            })
            .map(|(_, peer)| Arc::clone(peer))
            .collect();
        for peer in &peers {
            peer.link(&linker);
            linker.link(peer);
        }
        debug!(
            display = %source,
            link = %linker.link_id(),
            peers = peers.len(),
            "linker attached"
        );
        self.registry.attach_linker(source, linker);
    }

    /// Detach a linker from `source` and sever all its links.
    ///
    /// Tolerant of a missing registry entry: removal can arrive after the
    /// window's own teardown already ran. The unlink still happens so the
    /// linker's peers are released either way.
    fn detach_linker(&mut self, source: DisplayId, linker: &Arc<dyn SettingsLinker>) {
        self.registry.detach_linker(source, linker.token());
        linker.unlink_all();
        debug!(display = %source, link = %linker.link_id(), "linker detached");
    }

    /// Push a settings change out through every linker attached to
    /// `source`.
    ///
    /// A change for an untracked window is dropped silently; this race is
    /// expected when a live-acquisition display is cleared concurrently
    /// with a settings push. One linker's failure never stops delivery to
    /// its siblings.
    fn propagate_settings(&mut self, source: DisplayId, delta: &SettingsDelta) {
        let Some(linkers) = self.registry.linkers(source) else {
            debug!(display = %source, "settings change for untracked display ignored");
            return;
        };
        let linkers: Vec<Arc<dyn SettingsLinker>> = linkers.to_vec();
        for linker in linkers {
            if let Err(e) = linker.push_settings(delta) {
                warn!(
                    display = %source,
                    linker = %linker.token(),
                    error = %e,
                    "settings delivery failed, continuing with remaining linkers"
                );
            }
        }
    }

    /// Update fullscreen ownership for `source` and recompute visibility of
    /// every tracked window.
    fn fullscreen_toggled(&mut self, source: DisplayId, entering: bool, monitor: MonitorId) {
        if !self.registry.contains(source) {
            debug!(display = %source, "fullscreen toggle for untracked display ignored");
            return;
        }
        self.fullscreen
            .handle_toggle(source, entering, monitor, self.registry.windows());
    }
}
