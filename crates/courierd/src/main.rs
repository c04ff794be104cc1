//! courierd — courier node daemon.
//!
//! Owns the one live `NodeDirectory` for this node and hands it to every
//! collaborator: the config seeding path at startup and the diagnostics
//! API for the life of the process.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use courier_core::{CourierConfig, Keypair, NodeAddr, RecipientKey};
use courier_directory::{DirectorySnapshot, NodeDirectory};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = CourierConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = CourierConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        CourierConfig::default()
    });

    let own: NodeAddr = config
        .node
        .address
        .parse()
        .context("invalid [node].address in config")?;
    tracing::info!(addr = %own, "courierd starting");

    // Identity
    let keypair = Keypair::load_or_generate(&config.identity.keypair_path)
        .context("failed to initialize identity keypair")?;
    let public_key = keypair.public_key();
    tracing::info!(public_key = %public_key, "identity ready");

    // The one shared directory
    let directory = Arc::new(NodeDirectory::new(own.clone()));

    // Seed it from config, the same way a discovery reply would arrive
    let seed = seed_from_config(&config, &own, public_key);
    let changed = directory.merge(&seed);
    let snapshot = directory.snapshot();
    tracing::info!(
        changed,
        peers = snapshot.peers.len(),
        routes = snapshot.routes.len(),
        "directory seeded from config"
    );

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Spawn tasks ──────────────────────────────────────────────────────────

    let api_port = config.api.port;
    let api_task = {
        let state = courier_api::ApiState {
            directory: directory.clone(),
            public_key,
            started_at: Instant::now(),
        };
        tokio::spawn(async move {
            if let Err(e) = courier_api::serve(state, api_port).await {
                tracing::error!(error = %e, "diagnostics API failed");
            }
        })
    };

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => tracing::info!("shutting down"),
        r = api_task           => tracing::error!("API task exited: {:?}", r),
    }

    Ok(())
}

/// Build the startup seed: this node's own route plus the bootstrap
/// peers and pinned routes from config. Malformed entries are logged and
/// skipped — a typo in one peer must not keep the node down.
fn seed_from_config(
    config: &CourierConfig,
    own: &NodeAddr,
    own_key: RecipientKey,
) -> DirectorySnapshot {
    let mut seed = DirectorySnapshot::new(own.clone()).with_route(own_key, own.clone());

    for entry in &config.directory.bootstrap_peers {
        match entry.parse::<NodeAddr>() {
            Ok(addr) => seed = seed.with_peer(addr),
            Err(e) => {
                tracing::warn!(entry = %entry, error = %e, "skipping malformed bootstrap peer")
            }
        }
    }

    for entry in &config.directory.pinned_routes {
        match parse_pinned_route(entry) {
            Ok((recipient, addr)) => seed = seed.with_route(recipient, addr),
            Err(e) => {
                tracing::warn!(entry = %entry, error = %e, "skipping malformed pinned route")
            }
        }
    }

    seed
}

/// Parse a `<hex key>@<address>` pinned-route entry.
fn parse_pinned_route(entry: &str) -> Result<(RecipientKey, NodeAddr)> {
    let (key, addr) = entry
        .split_once('@')
        .context("expected <hex key>@<address>")?;
    Ok((key.trim().parse()?, addr.trim().parse()?))
}
