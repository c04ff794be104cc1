use crate::*;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use courier_api::ApiState;
use courier_directory::{DirectorySnapshot, NodeDirectory};

/// Serve the diagnostics API for one seeded directory on an ephemeral
/// port, returning the base URL.
async fn serve_api(directory: Arc<NodeDirectory>) -> Result<String> {
    let state = ApiState {
        directory,
        public_key: key(0xAA),
        started_at: Instant::now(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, courier_api::router(state)).await.ok();
    });

    Ok(format!("http://127.0.0.1:{port}/api"))
}

fn seeded_directory() -> Arc<NodeDirectory> {
    let dir = Arc::new(NodeDirectory::new(addr("http://node-a:9000")));
    dir.merge(
        &DirectorySnapshot::new(addr("http://node-b:9000"))
            .with_peer(addr("http://node-c:9000"))
            .with_route(key(0xB0), addr("http://node-b:9000")),
    );
    dir
}

#[tokio::test]
async fn status_reports_directory_summary() -> Result<()> {
    let dir = seeded_directory();
    let base = serve_api(dir.clone()).await?;

    let status: serde_json::Value = reqwest::get(format!("{base}/status")).await?.json().await?;

    assert_eq!(status["own_addr"], "http://node-a:9000");
    assert_eq!(status["peers_known"], 2);
    assert_eq!(status["routes_known"], 1);
    assert_eq!(status["public_key"], key(0xAA).to_string());
    assert_eq!(
        status["digest"].as_str().unwrap(),
        hex::encode(dir.snapshot().digest())
    );
    assert!(status["uptime_secs"].is_number());

    Ok(())
}

#[tokio::test]
async fn peers_and_routes_match_snapshots() -> Result<()> {
    let dir = seeded_directory();
    let base = serve_api(dir.clone()).await?;

    let peers: serde_json::Value = reqwest::get(format!("{base}/peers")).await?.json().await?;
    let listed: Vec<&str> = peers["peers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(listed, vec!["http://node-b:9000", "http://node-c:9000"]);

    let routes: serde_json::Value = reqwest::get(format!("{base}/routes")).await?.json().await?;
    let routes = routes["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["recipient"], key(0xB0).to_string());
    assert_eq!(routes[0]["addr"], "http://node-b:9000");

    Ok(())
}

#[tokio::test]
async fn resolve_distinguishes_known_unknown_malformed() -> Result<()> {
    let dir = seeded_directory();
    let base = serve_api(dir).await?;

    // Known recipient
    let resp = reqwest::get(format!("{base}/resolve/{}", key(0xB0))).await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["addr"], "http://node-b:9000");

    // Unknown recipient — a routable miss, not a server fault
    let resp = reqwest::get(format!("{base}/resolve/{}", key(0xC0))).await?;
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = resp.json().await?;
    assert!(body["error"].as_str().unwrap().contains("unknown recipient"));

    // Malformed key
    let resp = reqwest::get(format!("{base}/resolve/nothex")).await?;
    assert_eq!(resp.status().as_u16(), 400);

    Ok(())
}

/// The API serves fresh state after a merge happens behind it.
#[tokio::test]
async fn api_observes_later_merges() -> Result<()> {
    let dir = seeded_directory();
    let base = serve_api(dir.clone()).await?;

    let resp = reqwest::get(format!("{base}/resolve/{}", key(0xD0))).await?;
    assert_eq!(resp.status().as_u16(), 404);

    dir.merge(
        &DirectorySnapshot::new(addr("http://node-d:9000"))
            .with_route(key(0xD0), addr("http://node-d:9000")),
    );

    let resp = reqwest::get(format!("{base}/resolve/{}", key(0xD0))).await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["addr"], "http://node-d:9000");

    Ok(())
}
