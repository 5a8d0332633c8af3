//! Group Runtime
//!
//! One bounded queue, one drain task. Every notification - session-scoped
//! `display-created` from a [`GroupHandle`], window-scoped events from the
//! per-window adapters - lands in the same queue and is handled in arrival
//! order by the manager, which gives each window's events their delivery
//! order for free.

use crate::config::GroupConfig;
use crate::display::DisplayWindow;
use crate::group::{GroupManager, SessionEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Cloneable session-scope handle into the group queue
///
/// The host keeps at least one handle alive for the session's duration;
/// once every handle is dropped the runtime drains what is left and stops.
#[derive(Clone)]
pub struct GroupHandle {
    queue: mpsc::Sender<SessionEvent>,
}

impl GroupHandle {
    /// Announce a newly created display window to the group.
    ///
    /// Waits for queue capacity; window creation is not a notification that
    /// may be dropped.
    pub async fn display_created(&self, window: Arc<dyn DisplayWindow>) {
        if self
            .queue
            .send(SessionEvent::DisplayCreated(window))
            .await
            .is_err()
        {
            warn!("group runtime stopped - new display not tracked");
        }
    }
}

/// Owns the group manager and drains its notification queue
pub struct GroupRuntime {
    manager: GroupManager,
    queue_tx: mpsc::Sender<SessionEvent>,
    queue_rx: mpsc::Receiver<SessionEvent>,
}

impl GroupRuntime {
    /// Build a runtime and its manager from `config`.
    pub fn new(config: GroupConfig) -> Self {
        let (queue_tx, queue_rx) = mpsc::channel(config.event_queue_capacity.max(1));
        let manager = GroupManager::new(queue_tx.downgrade());
        Self {
            manager,
            queue_tx,
            queue_rx,
        }
    }

    /// A new session-scope handle into the queue.
    pub fn handle(&self) -> GroupHandle {
        GroupHandle {
            queue: self.queue_tx.clone(),
        }
    }

    /// Drain the queue until every [`GroupHandle`] is dropped, then return
    /// the manager with its final state.
    ///
    /// Window adapters hold only weak queue references, so lingering
    /// windows never keep a finished session alive.
    pub async fn run(mut self) -> GroupManager {
        // From here on only external handles keep the queue open.
        drop(self.queue_tx);
        info!("group runtime started");
        while let Some(event) = self.queue_rx.recv().await {
            self.manager.handle_session_event(event);
        }
        info!("group runtime stopped - all session handles closed");
        self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayId, MonitorId};

    struct FakeWindow {
        id: DisplayId,
    }

    impl DisplayWindow for FakeWindow {
        fn id(&self) -> DisplayId {
            self.id
        }
        fn monitor(&self) -> MonitorId {
            MonitorId(0)
        }
        fn set_visible(&self, _visible: bool) {}
    }

    #[tokio::test]
    async fn runtime_registers_and_stops_on_handle_drop() {
        let runtime = GroupRuntime::new(GroupConfig::default());
        let handle = runtime.handle();
        let task = tokio::spawn(runtime.run());

        handle
            .display_created(Arc::new(FakeWindow { id: DisplayId(1) }))
            .await;
        handle
            .display_created(Arc::new(FakeWindow { id: DisplayId(2) }))
            .await;
        drop(handle);

        let manager = task.await.unwrap();
        assert_eq!(manager.registry().len(), 2);
        assert!(manager.adapter(DisplayId(1)).is_some());
    }

    #[tokio::test]
    async fn handle_outliving_runtime_is_tolerated() {
        let runtime = GroupRuntime::new(GroupConfig::default());
        let handle = runtime.handle();
        drop(runtime);

        // The runtime is gone; announcing a display only logs.
        handle
            .display_created(Arc::new(FakeWindow { id: DisplayId(1) }))
            .await;
    }
}
