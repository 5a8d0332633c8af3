//! Per-Window Event Adapter
//!
//! Forwards one window's events into the group queue, tagged with the
//! window's identity so the manager knows which window originated what.
//! Stateless beyond the source id and the queue handle.

use crate::display::{DisplayId, MonitorId, SettingsDelta};
use crate::group::{SessionEvent, WindowEvent};
use crate::link::SettingsLinker;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Event adapter bound to one display window
///
/// Holds a weak queue handle: adapters never keep the group runtime alive
/// once the session's own handles are gone. Forwarding never blocks the
/// window's event thread; on a full queue the event is dropped with a
/// warning.
#[derive(Clone)]
pub struct WindowAdapter {
    source: DisplayId,
    queue: mpsc::WeakSender<SessionEvent>,
}

impl WindowAdapter {
    pub(crate) fn new(source: DisplayId, queue: mpsc::WeakSender<SessionEvent>) -> Self {
        Self { source, queue }
    }

    /// The window this adapter is bound to.
    pub fn source(&self) -> DisplayId {
        self.source
    }

    /// Forward a settings change originating on this window.
    pub fn settings_changed(&self, delta: SettingsDelta) {
        self.forward(WindowEvent::SettingsChanged(delta));
    }

    /// Forward a newly created link button's linker.
    pub fn linker_created(&self, linker: Arc<dyn SettingsLinker>) {
        self.forward(WindowEvent::LinkerCreated(linker));
    }

    /// Forward the removal of a linker from this window.
    pub fn linker_removed(&self, linker: Arc<dyn SettingsLinker>) {
        self.forward(WindowEvent::LinkerRemoved(linker));
    }

    /// Forward a fullscreen toggle on this window.
    pub fn fullscreen_toggled(&self, entering: bool, monitor: MonitorId) {
        self.forward(WindowEvent::FullscreenToggled { entering, monitor });
    }

    /// Forward the destruction of this window.
    pub fn destroyed(&self) {
        self.forward(WindowEvent::Destroyed);
    }

    fn forward(&self, event: WindowEvent) {
        let Some(queue) = self.queue.upgrade() else {
            debug!(display = %self.source, "group queue closed - event dropped");
            return;
        };
        if let Err(e) = queue.try_send(SessionEvent::Window {
            source: self.source,
            event,
        }) {
            match e {
                mpsc::error::TrySendError::Full(_) => {
                    warn!(display = %self.source, "group queue full - dropping event")
                }
                mpsc::error::TrySendError::Closed(_) => {
                    debug!(display = %self.source, "group queue closed - event dropped")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_tags_events_with_source() {
        let (tx, mut rx) = mpsc::channel(4);
        let adapter = WindowAdapter::new(DisplayId(3), tx.downgrade());

        adapter.fullscreen_toggled(true, MonitorId(1));

        match rx.try_recv().unwrap() {
            SessionEvent::Window { source, event } => {
                assert_eq!(source, DisplayId(3));
                assert!(matches!(
                    event,
                    WindowEvent::FullscreenToggled {
                        entering: true,
                        monitor: MonitorId(1)
                    }
                ));
            }
            SessionEvent::DisplayCreated(_) => panic!("unexpected session event"),
        }
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let adapter = WindowAdapter::new(DisplayId(1), tx.downgrade());

        adapter.destroyed();
        adapter.destroyed(); // queue full, dropped

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_queue_is_tolerated() {
        let (tx, _) = mpsc::channel(1);
        let adapter = WindowAdapter::new(DisplayId(1), tx.downgrade());
        drop(tx);
        // Must not panic once every strong sender is gone.
        adapter.destroyed();
    }
}
