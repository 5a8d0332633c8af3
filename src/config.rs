//! Group Runtime Configuration
//!
//! Options consumed by [`crate::group::GroupRuntime`] when it builds the
//! notification queue. The synchronous core itself is configuration-free.

/// Group runtime configuration
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Capacity of the bounded notification queue shared by the session
    /// handle and every window adapter.
    ///
    /// When the queue is full, adapters drop the notification and log a
    /// warning instead of blocking the window's event thread.
    pub event_queue_capacity: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: 64,
        }
    }
}
