//! Peer-data sources — what `merge` accepts, and the snapshot value.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use courier_core::{NodeAddr, RecipientKey};

/// A source of peer knowledge that can be merged into a directory.
///
/// Intentionally minimal: an own-address accessor plus owned copies of
/// the peer set and the route map. Implemented by `NodeDirectory` itself
/// and by `DirectorySnapshot`, so directories, snapshots, and any future
/// source of discovered peers are interchangeable at the merge seam.
pub trait PeerSource {
    /// The address of the node this knowledge came from.
    fn own_addr(&self) -> NodeAddr;

    /// Every peer address the source knows about.
    fn peer_addrs(&self) -> HashSet<NodeAddr>;

    /// Every recipient-to-node route the source knows about.
    fn routes(&self) -> HashMap<RecipientKey, NodeAddr>;
}

/// An owned, immutable copy of a directory's state.
///
/// This is both what snapshot accessors hand out (mutating it cannot
/// touch the live directory) and the candidate value a discovery-shaped
/// collaborator builds for `merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub own: NodeAddr,
    pub peers: HashSet<NodeAddr>,
    pub routes: HashMap<RecipientKey, NodeAddr>,
}

impl DirectorySnapshot {
    /// An empty snapshot for the given node address.
    pub fn new(own: NodeAddr) -> Self {
        Self {
            own,
            peers: HashSet::new(),
            routes: HashMap::new(),
        }
    }

    /// Add a known peer address.
    pub fn with_peer(mut self, addr: NodeAddr) -> Self {
        self.peers.insert(addr);
        self
    }

    /// Add a route. The route's address joins the peer set as well, so a
    /// built candidate is always well-formed (a node owning a known
    /// identity is a known peer).
    pub fn with_route(mut self, recipient: RecipientKey, addr: NodeAddr) -> Self {
        self.peers.insert(addr.clone());
        self.routes.insert(recipient, addr);
        self
    }

    /// BLAKE3 digest over the canonical encoding of the shared knowledge
    /// (peers and routes, sorted — the `own` vantage point is excluded).
    ///
    /// Two nodes holding the same knowledge produce the same digest
    /// regardless of insertion order or which node computed it, making
    /// this a cheap convergence check between gossiping nodes.
    pub fn digest(&self) -> [u8; 32] {
        let mut canonical = String::new();

        let mut peers: Vec<String> = self.peers.iter().map(|a| a.to_string()).collect();
        peers.sort();
        for peer in &peers {
            canonical.push_str(peer);
            canonical.push('\n');
        }

        let mut routes: Vec<(String, String)> = self
            .routes
            .iter()
            .map(|(k, a)| (k.to_string(), a.to_string()))
            .collect();
        routes.sort();
        for (recipient, addr) in &routes {
            canonical.push_str(recipient);
            canonical.push(' ');
            canonical.push_str(addr);
            canonical.push('\n');
        }

        *blake3::hash(canonical.as_bytes()).as_bytes()
    }
}

impl PeerSource for DirectorySnapshot {
    fn own_addr(&self) -> NodeAddr {
        self.own.clone()
    }

    fn peer_addrs(&self) -> HashSet<NodeAddr> {
        self.peers.clone()
    }

    fn routes(&self) -> HashMap<RecipientKey, NodeAddr> {
        self.routes.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
