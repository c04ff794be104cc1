//! The node directory — who exists, where they are, who delivers to whom.
//!
//! One `NodeDirectory` is created per running node and shared (behind an
//! `Arc`) between the routing hot path, the startup seeding path, and the
//! diagnostics API. Readers take snapshots and resolve recipients
//! concurrently; writers converge externally-learned knowledge via
//! `merge`.
//!
//! Both collections live behind a single `RwLock`, because the directory
//! has a cross-collection invariant: every address appearing as a route
//! value is also a member of the peer set. A reader must never observe a
//! state in which that does not hold, so every merge is applied under one
//! write-lock acquisition and every snapshot is taken under one read-lock
//! acquisition.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use courier_core::{NodeAddr, RecipientKey};

use crate::error::UnknownRecipient;
use crate::source::{DirectorySnapshot, PeerSource};

struct Inner {
    peers: HashSet<NodeAddr>,
    routes: HashMap<RecipientKey, NodeAddr>,
}

/// Thread-safe registry of the local node's address, known peers, and
/// recipient routes.
///
/// Growth is monotonic: merging never removes a peer or a route; a route
/// may only be overwritten when the source maps its key to a different
/// address (last merge wins, modelling a recipient identity that moved
/// to a new node).
pub struct NodeDirectory {
    own: NodeAddr,
    inner: RwLock<Inner>,
}

impl NodeDirectory {
    /// Create a directory for a node reachable at `own`. The own address
    /// is fixed for the life of the directory.
    pub fn new(own: NodeAddr) -> Self {
        Self {
            own,
            inner: RwLock::new(Inner {
                peers: HashSet::new(),
                routes: HashMap::new(),
            }),
        }
    }

    /// This node's own address.
    pub fn own_addr(&self) -> NodeAddr {
        self.own.clone()
    }

    /// Copy of the known peer addresses. The copy is the caller's —
    /// mutating it cannot affect the directory.
    pub fn peer_addrs(&self) -> HashSet<NodeAddr> {
        self.inner.read().peers.clone()
    }

    /// Copy of the full recipient-to-node route map.
    pub fn routes(&self) -> HashMap<RecipientKey, NodeAddr> {
        self.inner.read().routes.clone()
    }

    /// A consistent snapshot of the whole directory, taken under one
    /// read-lock acquisition.
    pub fn snapshot(&self) -> DirectorySnapshot {
        let inner = self.inner.read();
        DirectorySnapshot {
            own: self.own.clone(),
            peers: inner.peers.clone(),
            routes: inner.routes.clone(),
        }
    }

    /// The address of the node that delivers to `recipient`.
    ///
    /// An unknown recipient is an expected outcome (`UnknownRecipient`),
    /// not a defect — the caller decides whether to retry after the next
    /// discovery cycle or surface a delivery failure.
    pub fn resolve(&self, recipient: &RecipientKey) -> Result<NodeAddr, UnknownRecipient> {
        self.inner
            .read()
            .routes
            .get(recipient)
            .cloned()
            .ok_or(UnknownRecipient(*recipient))
    }

    /// Integrate another source's peer knowledge into this directory.
    ///
    /// New peer addresses and new routes are added; a route whose key is
    /// already present is overwritten only if the source maps it to a
    /// different address, and the new address joins the peer set in the
    /// same critical section. Returns `true` iff anything changed —
    /// the signal a gossip collaborator uses to decide whether the
    /// update is worth propagating further.
    ///
    /// The source is read in full before the write lock is taken, so a
    /// merge is atomic with respect to concurrent readers and merging a
    /// directory with itself is safe (and a no-op).
    pub fn merge(&self, other: &impl PeerSource) -> bool {
        let source = other.own_addr();
        let incoming_peers = other.peer_addrs();
        let incoming_routes = other.routes();

        let mut new_peers = 0usize;
        let mut new_routes = 0usize;
        let mut moved_routes = 0usize;

        let mut inner = self.inner.write();
        for addr in incoming_peers {
            if inner.peers.insert(addr) {
                new_peers += 1;
            }
        }
        for (recipient, addr) in incoming_routes {
            let stale = match inner.routes.get(&recipient) {
                Some(existing) => *existing != addr,
                None => true,
            };
            if !stale {
                continue;
            }
            inner.peers.insert(addr.clone());
            if inner.routes.insert(recipient, addr).is_some() {
                moved_routes += 1;
            } else {
                new_routes += 1;
            }
        }
        drop(inner);

        let changed = new_peers + new_routes + moved_routes > 0;
        if changed {
            tracing::debug!(
                source = %source,
                new_peers,
                new_routes,
                moved_routes,
                "merged peer knowledge"
            );
        }
        changed
    }
}

impl PeerSource for NodeDirectory {
    fn own_addr(&self) -> NodeAddr {
        self.own.clone()
    }

    fn peer_addrs(&self) -> HashSet<NodeAddr> {
        self.inner.read().peers.clone()
    }

    fn routes(&self) -> HashMap<RecipientKey, NodeAddr> {
        self.inner.read().routes.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
