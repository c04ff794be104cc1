use crate::*;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use courier_directory::{DirectorySnapshot, NodeDirectory};

/// One merging thread, several resolving/snapshotting threads.
///
/// No reader may ever observe a route whose address is missing from the
/// peer set — merges must be atomic from the readers' point of view.
#[test]
fn merge_is_atomic_under_read_load() {
    let dir = Arc::new(NodeDirectory::new(addr("http://node-a:9000")));
    let done = Arc::new(AtomicBool::new(false));
    let merges = 500u16;

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let dir = dir.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                let mut observed = 0usize;
                while !done.load(Ordering::Relaxed) {
                    let snap = dir.snapshot();
                    for route_addr in snap.routes.values() {
                        assert!(
                            snap.peers.contains(route_addr),
                            "reader observed route to {} without a matching peer",
                            route_addr
                        );
                    }
                    observed = observed.max(snap.routes.len());
                }
                observed
            })
        })
        .collect();

    for i in 0..merges {
        let peer = addr(&format!("http://node-{i}:9000"));
        let mut bytes = [0u8; 32];
        bytes[..2].copy_from_slice(&i.to_be_bytes());
        let update = DirectorySnapshot::new(peer.clone())
            .with_route(courier_core::RecipientKey::from_bytes(bytes), peer);
        dir.merge(&update);
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        let max_seen = reader.join().unwrap();
        assert!(max_seen <= merges as usize);
    }

    assert_eq!(dir.routes().len(), merges as usize);
}

/// Concurrent merges from several sources serialize cleanly: the end
/// state is the union, and nothing is lost.
#[test]
fn concurrent_merges_reach_the_union() {
    let dir = Arc::new(NodeDirectory::new(addr("http://node-a:9000")));
    let writers = 4u8;
    let per_writer = 50u8;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let dir = dir.clone();
            std::thread::spawn(move || {
                for i in 0..per_writer {
                    let peer = addr(&format!("http://node-{w}-{i}:9000"));
                    let mut bytes = [0u8; 32];
                    bytes[0] = w;
                    bytes[1] = i;
                    let update = DirectorySnapshot::new(peer.clone())
                        .with_route(courier_core::RecipientKey::from_bytes(bytes), peer);
                    dir.merge(&update);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snap = dir.snapshot();
    assert_eq!(snap.routes.len(), writers as usize * per_writer as usize);

    let expected: HashSet<_> = (0..writers)
        .flat_map(|w| (0..per_writer).map(move |i| addr(&format!("http://node-{w}-{i}:9000"))))
        .collect();
    assert_eq!(snap.peers, expected);

    for route_addr in snap.routes.values() {
        assert!(snap.peers.contains(route_addr));
    }
}
