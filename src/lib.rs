//! # display-group
//!
//! Coordination core for a dynamic group of display windows belonging to one
//! application session. It keeps linked display settings synchronized across
//! windows and computes cross-window visibility for exclusive fullscreen
//! presentation on multi-monitor setups.
//!
//! # Architecture
//!
//! ```text
//! display-group
//!   ├─> Display Registry       (tracked windows + per-window linker sets)
//!   ├─> Linker Graph           (auto-link by logical identity, settings fan-out)
//!   ├─> Fullscreen Coordinator (per-monitor ownership + visibility pass)
//!   └─> Group Manager          (event dispatch, error containment)
//! ```
//!
//! # Data Flow
//!
//! **Session path:** host → [`GroupHandle`] → queue → [`GroupRuntime`] →
//! [`GroupManager`] (new windows)
//!
//! **Window path:** window event stream → [`group::WindowAdapter`] (tags the
//! source id) → queue → [`GroupRuntime`] → [`GroupManager`] handlers
//!
//! **Settings path:** settings change → linkers of the source window →
//! linked peer endpoints → [`SettingsSink`] on each linked window
//!
//! The core itself is a synchronous state machine: every handler runs to
//! completion on the runtime's single drain task, so notifications from one
//! window are always processed in delivery order. Hosts that already have a
//! serialized event thread can drive [`GroupManager`] directly and skip the
//! runtime entirely.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Runtime options for the group runtime
pub mod config;

/// Display window identity, monitor identity, and settings payloads
pub mod display;

/// Fullscreen ownership tracking and visibility recomputation
pub mod fullscreen;

/// Composition root: manager, per-window adapters, and the event runtime
pub mod group;

/// Settings linker boundary and the concrete link endpoint
pub mod link;

/// Tracked-window registry with per-window linker sets
pub mod registry;

pub use config::GroupConfig;
pub use display::{DisplayId, DisplayWindow, MonitorId, SettingsDelta};
pub use group::{GroupHandle, GroupManager, GroupRuntime, SessionEvent, WindowEvent};
pub use link::{LinkEndpoint, LinkError, LinkId, LinkerToken, SettingsLinker, SettingsSink};
