//! Group Coordination
//!
//! Composition root of the crate. [`GroupManager`] owns the display
//! registry, the linker graph, and the fullscreen coordinator, and routes
//! every notification to exactly one handler. [`WindowAdapter`] tags
//! window-scoped events with the originating window before they enter the
//! queue, and [`GroupRuntime`] drains that queue on a single task.
//!
//! # Notification routing
//!
//! ```text
//! display-created    ─> register window        (registry + adapter)
//! settings-changed   ─> propagate to linkers   (linker graph)
//! linker-created     ─> attach + auto-link     (linker graph)
//! linker-removed     ─> detach linker          (linker graph)
//! fullscreen-toggled ─> coordinate visibility  (fullscreen coordinator)
//! window-destroyed   ─> unregister window      (registry)
//! ```

mod adapter;
mod manager;
mod runtime;

pub use adapter::WindowAdapter;
pub use manager::GroupManager;
pub use runtime::{GroupHandle, GroupRuntime};

use crate::display::{DisplayId, DisplayWindow, MonitorId, SettingsDelta};
use crate::link::SettingsLinker;
use std::sync::Arc;

/// Window-scoped notification, before source tagging
#[derive(Clone)]
pub enum WindowEvent {
    /// The window's display settings changed.
    SettingsChanged(SettingsDelta),

    /// A link button was created on the window; its linker must be tracked
    /// and auto-linked.
    LinkerCreated(Arc<dyn SettingsLinker>),

    /// A linker was removed from the window.
    LinkerRemoved(Arc<dyn SettingsLinker>),

    /// The window entered or exited exclusive fullscreen on `monitor`.
    FullscreenToggled {
        /// True when entering fullscreen, false when exiting.
        entering: bool,
        /// Monitor the toggle applies to.
        monitor: MonitorId,
    },

    /// The window was destroyed by its owner.
    Destroyed,
}

/// Session-scoped notification consumed by the group manager
#[derive(Clone)]
pub enum SessionEvent {
    /// A new display window joined the session.
    DisplayCreated(Arc<dyn DisplayWindow>),

    /// A window-scoped event, tagged with its source by the window's
    /// adapter.
    Window {
        /// The window the event originated on.
        source: DisplayId,
        /// The event itself.
        event: WindowEvent,
    },
}
