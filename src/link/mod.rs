//! Settings Linker Boundary
//!
//! A settings linker is one endpoint of a synchronization relationship for
//! one display window. Endpoints that share a [`LinkId`] are discovered and
//! linked to each other by the group manager; a settings change pushed into
//! one endpoint is re-dispatched to every linked peer.
//!
//! The merge/apply logic for a settings value lives behind the
//! [`SettingsSink`] seam and is not this crate's concern. The peer
//! bookkeeping protocol is, and [`LinkEndpoint`] implements it.

use crate::display::SettingsDelta;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

use thiserror::Error;

/// Result type for linker operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Linker error types
#[derive(Error, Debug)]
pub enum LinkError {
    /// The receiving endpoint rejected the settings change.
    #[error("settings rejected by endpoint: {0}")]
    Rejected(String),

    /// The endpoint's window is gone and can no longer accept changes.
    #[error("link endpoint already detached")]
    Detached,
}

/// Logical identity of a synchronization group
///
/// Linkers on different windows that carry the same `LinkId` belong to the
/// same group ("the same link button pressed on two windows") and are linked
/// automatically, regardless of creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// Unique token of one linker endpoint object
///
/// Distinguishes endpoint objects that share a [`LinkId`]; the group manager
/// uses it to avoid linking an endpoint to itself and to address one peer
/// during unlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkerToken(u64);

impl LinkerToken {
    /// Allocate a token never handed out before in this process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LinkerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linker-{}", self.0)
    }
}

/// Window-side application of an inbound settings change
///
/// The display window supplies this when it creates a link endpoint; what a
/// settings change *means* is decided entirely behind this seam.
pub trait SettingsSink: Send + Sync {
    /// Apply a settings change that originated on a linked window.
    fn apply_settings(&self, delta: &SettingsDelta) -> Result<()>;
}

/// One endpoint of a settings synchronization relationship
///
/// The group manager establishes links in both directions explicitly, so
/// `link` only records the caller's own side.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsLinker: Send + Sync {
    /// Logical identity shared by all endpoints of one group.
    fn link_id(&self) -> LinkId;

    /// Unique token of this endpoint object.
    fn token(&self) -> LinkerToken;

    /// Record `peer` as a linked sibling of this endpoint.
    fn link(&self, peer: &Arc<dyn SettingsLinker>);

    /// Drop the sibling with `token` from this endpoint only.
    fn unlink(&self, token: LinkerToken);

    /// Sever every current link in both directions.
    fn unlink_all(&self);

    /// Re-dispatch a settings change from this endpoint's own window to all
    /// linked siblings.
    ///
    /// Delivery continues past individual sibling failures; the first error
    /// encountered is returned after the remaining siblings were attempted.
    fn push_settings(&self, delta: &SettingsDelta) -> Result<()>;

    /// Accept a settings change re-dispatched by a linked sibling.
    fn apply(&self, delta: &SettingsDelta) -> Result<()>;
}

/// Concrete [`SettingsLinker`] with weak-reference peer bookkeeping
///
/// Peers are held weakly: an endpoint whose window died without a clean
/// unlink is pruned on the next traversal instead of being kept alive.
pub struct LinkEndpoint {
    id: LinkId,
    token: LinkerToken,
    sink: Arc<dyn SettingsSink>,
    peers: Mutex<Vec<(LinkerToken, Weak<dyn SettingsLinker>)>>,
}

impl LinkEndpoint {
    /// Create an endpoint for the group `id`, applying inbound changes to
    /// `sink`.
    pub fn new(id: LinkId, sink: Arc<dyn SettingsSink>) -> Arc<Self> {
        Arc::new(Self {
            id,
            token: LinkerToken::next(),
            sink,
            peers: Mutex::new(Vec::new()),
        })
    }

    /// Number of currently live peers.
    pub fn peer_count(&self) -> usize {
        self.peers.lock().iter().filter(|(_, w)| w.strong_count() > 0).count()
    }

    /// Snapshot live peers and prune dead ones while holding the lock.
    fn live_peers(&self) -> Vec<Arc<dyn SettingsLinker>> {
        let mut guard = self.peers.lock();
        let mut live = Vec::with_capacity(guard.len());
        guard.retain(|(_, weak)| match weak.upgrade() {
            Some(peer) => {
                live.push(peer);
                true
            }
            None => false,
        });
        live
    }
}

impl SettingsLinker for LinkEndpoint {
    fn link_id(&self) -> LinkId {
        self.id
    }

    fn token(&self) -> LinkerToken {
        self.token
    }

    fn link(&self, peer: &Arc<dyn SettingsLinker>) {
        let mut guard = self.peers.lock();
        if guard.iter().any(|(token, _)| *token == peer.token()) {
            return;
        }
        guard.push((peer.token(), Arc::downgrade(peer)));
        debug!(endpoint = %self.token, peer = %peer.token(), "link established");
    }

    fn unlink(&self, token: LinkerToken) {
        self.peers.lock().retain(|(peer_token, _)| *peer_token != token);
    }

    fn unlink_all(&self) {
        // Snapshot first: a peer's unlink callback must not observe the lock.
        let peers = {
            let mut guard = self.peers.lock();
            std::mem::take(&mut *guard)
        };
        for (_, weak) in peers {
            if let Some(peer) = weak.upgrade() {
                peer.unlink(self.token);
            }
        }
        debug!(endpoint = %self.token, "all links severed");
    }

    fn push_settings(&self, delta: &SettingsDelta) -> Result<()> {
        let mut first_error = None;
        for peer in self.live_peers() {
            if let Err(e) = peer.apply(delta) {
                debug!(endpoint = %self.token, peer = %peer.token(), error = %e,
                    "peer rejected settings change");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn apply(&self, delta: &SettingsDelta) -> Result<()> {
        self.sink.apply_settings(delta)
    }
}
