//! Display Window Boundary
//!
//! Identity types for display windows and monitors, the [`DisplayWindow`]
//! collaborator trait, and the [`SettingsDelta`] payload carried by
//! settings-changed notifications.
//!
//! The group core never creates or destroys a display window; it holds
//! references to externally owned windows and reacts to lifecycle
//! notifications about them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of one display window within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub u64);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display-{}", self.0)
    }
}

/// Identity of one physical monitor configuration
///
/// Two windows report the same `MonitorId` exactly when they currently
/// occupy the same physical screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonitorId(pub u32);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monitor-{}", self.0)
    }
}

/// One externally owned display window
///
/// Implementations must tolerate calls from the group runtime's drain task;
/// the core only ever calls these three methods and never retains a window
/// past its window-destroyed notification.
pub trait DisplayWindow: Send + Sync {
    /// Stable identity of this window.
    fn id(&self) -> DisplayId;

    /// Monitor the window currently occupies.
    fn monitor(&self) -> MonitorId;

    /// Show or hide the window.
    fn set_visible(&self, visible: bool);

    /// Bind a freshly created per-window adapter to this window's event
    /// stream.
    ///
    /// Called once by the group manager when the window is registered. The
    /// window (or its event substrate) keeps the adapter and forwards every
    /// relevant event through it. The default implementation drops the
    /// adapter, for hosts that fetch it from the manager instead.
    fn attach_events(&self, adapter: crate::group::WindowAdapter) {
        let _ = adapter;
    }
}

/// A change to one window's display settings
///
/// Passive data holder: the core forwards it verbatim to linked endpoints
/// and never interprets the fields. All fields are optional so a delta can
/// describe exactly the settings that changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDelta {
    /// Zoom / magnification level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,

    /// Contrast limits as (min, max).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<(i32, i32)>,

    /// Color display mode name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<String>,

    /// Changed pixel calibration, in micrometers per pixel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_size_um: Option<f64>,

    /// Renderer-specific settings not modeled as first-class fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl SettingsDelta {
    /// True when the delta carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.zoom.is_none()
            && self.contrast.is_none()
            && self.color_mode.is_none()
            && self.pixel_size_um.is_none()
            && self.extra.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_delta_serializes_to_empty_object() {
        let delta = SettingsDelta::default();
        assert!(delta.is_empty());
        let json = serde_json::to_string(&delta).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn delta_round_trips_changed_fields() {
        let delta = SettingsDelta {
            zoom: Some(2.0),
            pixel_size_um: Some(0.108),
            ..Default::default()
        };
        assert!(!delta.is_empty());

        let json = serde_json::to_string(&delta).unwrap();
        let back: SettingsDelta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, delta);
    }

    #[test]
    fn identity_display_formats() {
        assert_eq!(DisplayId(7).to_string(), "display-7");
        assert_eq!(MonitorId(1).to_string(), "monitor-1");
    }
}
