//! Group coordination integration tests
//!
//! Exercises the full stack: session handle and window adapters feeding the
//! runtime queue, plus the synchronous manager surface hosts with their own
//! event thread would drive directly.

use display_group::{
    DisplayId, DisplayWindow, GroupConfig, GroupManager, GroupRuntime, LinkEndpoint, LinkId,
    MonitorId, SessionEvent, SettingsDelta, SettingsLinker, SettingsSink, WindowEvent,
};
use display_group::group::WindowAdapter;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Display window double: tracks visibility and captures its adapter.
struct FakeDisplay {
    id: DisplayId,
    monitor: MonitorId,
    visible: Mutex<bool>,
    adapter: Mutex<Option<WindowAdapter>>,
}

impl FakeDisplay {
    fn new(id: u64, monitor: u32) -> Arc<Self> {
        Arc::new(Self {
            id: DisplayId(id),
            monitor: MonitorId(monitor),
            visible: Mutex::new(true),
            adapter: Mutex::new(None),
        })
    }

    fn visible(&self) -> bool {
        *self.visible.lock()
    }

    fn adapter(&self) -> Option<WindowAdapter> {
        self.adapter.lock().clone()
    }

    async fn wait_for_adapter(&self) -> WindowAdapter {
        for _ in 0..500 {
            if let Some(adapter) = self.adapter() {
                return adapter;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("adapter was never bound to {}", self.id);
    }
}

impl DisplayWindow for FakeDisplay {
    fn id(&self) -> DisplayId {
        self.id
    }

    fn monitor(&self) -> MonitorId {
        self.monitor
    }

    fn set_visible(&self, visible: bool) {
        *self.visible.lock() = visible;
    }

    fn attach_events(&self, adapter: WindowAdapter) {
        *self.adapter.lock() = Some(adapter);
    }
}

/// Sink double counting every applied delta.
struct CountingSink {
    applied: Mutex<Vec<SettingsDelta>>,
}

impl CountingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            applied: Mutex::new(Vec::new()),
        })
    }

    fn count(&self) -> usize {
        self.applied.lock().len()
    }

    fn last(&self) -> Option<SettingsDelta> {
        self.applied.lock().last().cloned()
    }
}

impl SettingsSink for CountingSink {
    fn apply_settings(&self, delta: &SettingsDelta) -> display_group::link::Result<()> {
        self.applied.lock().push(delta.clone());
        Ok(())
    }
}

fn zoom(level: f64) -> SettingsDelta {
    SettingsDelta {
        zoom: Some(level),
        ..Default::default()
    }
}

/// Direct-drive manager plus the queue endpoints its adapters forward into.
fn direct_manager() -> (GroupManager, mpsc::Sender<SessionEvent>, mpsc::Receiver<SessionEvent>) {
    let (tx, rx) = mpsc::channel(16);
    (GroupManager::new(tx.downgrade()), tx, rx)
}

#[test]
fn linked_settings_follow_across_windows() {
    init_logging();
    let (mut manager, _tx, _rx) = direct_manager();

    let w1 = FakeDisplay::new(1, 1);
    let w2 = FakeDisplay::new(2, 1);
    manager.handle_session_event(SessionEvent::DisplayCreated(w1));
    manager.handle_session_event(SessionEvent::DisplayCreated(w2));

    let sink1 = CountingSink::new();
    let sink2 = CountingSink::new();
    let l1 = LinkEndpoint::new(LinkId(1), sink1.clone());
    let l2 = LinkEndpoint::new(LinkId(1), sink2.clone());
    manager.handle_window_event(DisplayId(1), WindowEvent::LinkerCreated(l1));
    manager.handle_window_event(DisplayId(2), WindowEvent::LinkerCreated(l2));

    manager.handle_window_event(DisplayId(1), WindowEvent::SettingsChanged(zoom(2.5)));

    assert_eq!(sink2.count(), 1);
    assert_eq!(sink2.last(), Some(zoom(2.5)));
    // The change never loops back onto its own window.
    assert_eq!(sink1.count(), 0);
}

#[test]
fn fullscreen_exclusivity_scenario() {
    init_logging();
    let (mut manager, _tx, _rx) = direct_manager();

    let w1 = FakeDisplay::new(1, 1);
    let w2 = FakeDisplay::new(2, 1);
    let w3 = FakeDisplay::new(3, 2);
    for w in [&w1, &w2, &w3] {
        manager.handle_session_event(SessionEvent::DisplayCreated(w.clone()));
    }

    let enter = |monitor| WindowEvent::FullscreenToggled {
        entering: true,
        monitor: MonitorId(monitor),
    };
    let exit = |monitor| WindowEvent::FullscreenToggled {
        entering: false,
        monitor: MonitorId(monitor),
    };

    manager.handle_window_event(DisplayId(1), enter(1));
    assert!(w1.visible());
    assert!(!w2.visible());
    assert!(w3.visible());

    manager.handle_window_event(DisplayId(3), enter(2));
    assert!(w1.visible());
    assert!(!w2.visible());
    assert!(w3.visible());

    manager.handle_window_event(DisplayId(1), exit(1));
    assert!(w1.visible());
    assert!(w2.visible());
    assert!(w3.visible());
    assert_eq!(manager.coordinator().owner(MonitorId(2)), Some(DisplayId(3)));
}

#[test]
fn teardown_replay_leaves_registry_symmetric() {
    init_logging();
    let (mut manager, _tx, _rx) = direct_manager();

    for id in 1..=4u64 {
        manager.handle_session_event(SessionEvent::DisplayCreated(FakeDisplay::new(id, 1)));
    }
    manager.handle_window_event(DisplayId(2), WindowEvent::Destroyed);
    manager.handle_window_event(DisplayId(4), WindowEvent::Destroyed);
    // Replayed destroy of an already-gone window stays a no-op.
    manager.handle_window_event(DisplayId(2), WindowEvent::Destroyed);

    let tracked: Vec<u64> = manager.registry().windows().map(|w| w.id().0).collect();
    assert_eq!(tracked, vec![1, 3]);
}

#[tokio::test]
async fn adapters_drive_the_runtime_end_to_end() {
    init_logging();
    let runtime = GroupRuntime::new(GroupConfig::default());
    let handle = runtime.handle();
    let task = tokio::spawn(runtime.run());

    let w1 = FakeDisplay::new(1, 1);
    let w2 = FakeDisplay::new(2, 1);
    handle.display_created(w1.clone()).await;
    handle.display_created(w2.clone()).await;

    let adapter1 = w1.wait_for_adapter().await;
    let adapter2 = w2.wait_for_adapter().await;
    assert_eq!(adapter1.source(), DisplayId(1));

    let sink2 = CountingSink::new();
    adapter1.linker_created(LinkEndpoint::new(LinkId(1), CountingSink::new()) as Arc<dyn SettingsLinker>);
    adapter2.linker_created(LinkEndpoint::new(LinkId(1), sink2.clone()) as Arc<dyn SettingsLinker>);

    adapter1.settings_changed(zoom(3.0));
    adapter1.fullscreen_toggled(true, MonitorId(1));
    adapter1.destroyed();

    // Closing the session handle lets the runtime drain and stop.
    drop(handle);
    let manager = task.await.unwrap();

    // The settings change landed on the linked window before teardown.
    assert_eq!(sink2.count(), 1);
    // W1 went fullscreen, hiding W2, and was then destroyed, releasing M1.
    assert!(!manager.registry().contains(DisplayId(1)));
    assert!(manager.registry().contains(DisplayId(2)));
    assert_eq!(manager.coordinator().owner(MonitorId(1)), None);
    assert!(!w2.visible());
}
