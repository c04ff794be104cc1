use crate::*;

use courier_directory::{DirectorySnapshot, NodeDirectory, UnknownRecipient};

/// The canonical two-node exchange: node-a learns about node-b and one
/// recipient hosted there.
#[test]
fn two_node_exchange() {
    let local = NodeDirectory::new(addr("http://node-a:9000"));
    assert!(local.routes().is_empty());

    let learned = DirectorySnapshot::new(addr("http://node-b:9000"))
        .with_peer(addr("http://node-b:9000"))
        .with_route(key(0xB0), addr("http://node-b:9000"));

    // First merge changes local state — worth propagating
    assert!(local.merge(&learned));

    assert_eq!(
        local.resolve(&key(0xB0)).unwrap(),
        addr("http://node-b:9000")
    );
    assert_eq!(
        local.resolve(&key(0xC0)),
        Err(UnknownRecipient(key(0xC0)))
    );

    // The same knowledge again is a no-op — no rebroadcast storm
    assert!(!local.merge(&learned));
}

/// Two directories with disjoint knowledge converge after a mutual
/// exchange, and their digests agree once they do.
#[test]
fn mutual_merge_converges() {
    let a = NodeDirectory::new(addr("http://node-a:9000"));
    let b = NodeDirectory::new(addr("http://node-b:9000"));

    a.merge(
        &DirectorySnapshot::new(addr("http://node-a:9000"))
            .with_route(key(0xA0), addr("http://node-a:9000")),
    );
    b.merge(
        &DirectorySnapshot::new(addr("http://node-b:9000"))
            .with_route(key(0xB0), addr("http://node-b:9000")),
    );

    assert_ne!(a.snapshot().digest(), b.snapshot().digest());

    // A directory is itself a PeerSource — exchange them directly
    assert!(a.merge(&b));
    assert!(b.merge(&a));

    assert_eq!(a.peer_addrs(), b.peer_addrs());
    assert_eq!(a.routes(), b.routes());
    assert_eq!(a.snapshot().digest(), b.snapshot().digest());

    // Fully converged: further exchanges change nothing
    assert!(!a.merge(&b));
    assert!(!b.merge(&a));
}

/// A recipient identity migrating between nodes is resolvable at its new
/// home on every directory that hears about the move, regardless of what
/// it knew before.
#[test]
fn identity_migration_propagates() {
    let a = NodeDirectory::new(addr("http://node-a:9000"));
    let b = NodeDirectory::new(addr("http://node-b:9000"));

    let old_home = DirectorySnapshot::new(addr("http://node-c:9000"))
        .with_route(key(0xEE), addr("http://node-c:9000"));
    a.merge(&old_home);
    b.merge(&old_home);

    // The identity moves to node-d; only a hears at first
    let new_home = DirectorySnapshot::new(addr("http://node-d:9000"))
        .with_route(key(0xEE), addr("http://node-d:9000"));
    assert!(a.merge(&new_home));
    assert_eq!(a.resolve(&key(0xEE)).unwrap(), addr("http://node-d:9000"));
    assert_eq!(b.resolve(&key(0xEE)).unwrap(), addr("http://node-c:9000"));

    // b hears it from a
    assert!(b.merge(&a));
    assert_eq!(b.resolve(&key(0xEE)).unwrap(), addr("http://node-d:9000"));
}
