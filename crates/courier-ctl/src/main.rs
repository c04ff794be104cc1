//! courier-ctl — command-line interface for the courier daemon.

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 9601;

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StatusResponse {
    own_addr: String,
    public_key: String,
    peers_known: usize,
    routes_known: usize,
    digest: String,
    uptime_secs: u64,
}

#[derive(Deserialize)]
struct PeersResponse {
    peers: Vec<String>,
}

#[derive(Deserialize)]
struct RoutesResponse {
    routes: Vec<RouteInfo>,
}

#[derive(Deserialize)]
struct RouteInfo {
    recipient: String,
    addr: String,
}

// ── HTTP helpers ──────────────────────────────────────────────────────────────

fn base_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/api", port)
}

async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("failed to connect to courierd at {} — is it running?", url))?;
    if !resp.status().is_success() {
        anyhow::bail!("daemon returned {} for {}", resp.status(), url);
    }
    resp.json::<T>().await.context("failed to parse response")
}

// ── Subcommand handlers ───────────────────────────────────────────────────────

async fn cmd_status(port: u16) -> Result<()> {
    let resp: StatusResponse = get_json(&format!("{}/status", base_url(port))).await?;

    println!("═══════════════════════════════════════");
    println!("  Courier Daemon Status");
    println!("═══════════════════════════════════════");
    println!("  Own address  : {}", resp.own_addr);
    println!("  Public key   : {}", resp.public_key);
    println!("  Peers known  : {}", resp.peers_known);
    println!("  Routes known : {}", resp.routes_known);
    println!("  Digest       : {}", &resp.digest[..16]);
    println!("  Uptime       : {}s", resp.uptime_secs);

    Ok(())
}

async fn cmd_peers(port: u16) -> Result<()> {
    let resp: PeersResponse = get_json(&format!("{}/peers", base_url(port))).await?;

    if resp.peers.is_empty() {
        println!("No peers known yet.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Known Peers ({})", resp.peers.len());
    println!("═══════════════════════════════════════");
    for peer in &resp.peers {
        println!("  {}", peer);
    }

    Ok(())
}

async fn cmd_routes(port: u16) -> Result<()> {
    let resp: RoutesResponse = get_json(&format!("{}/routes", base_url(port))).await?;

    if resp.routes.is_empty() {
        println!("No routes known yet.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Known Routes ({})", resp.routes.len());
    println!("═══════════════════════════════════════");
    for route in &resp.routes {
        println!("  ┌─ {}", &route.recipient[..16]);
        println!("  └─ via {}", route.addr);
    }

    Ok(())
}

async fn cmd_resolve(port: u16, key: &str) -> Result<()> {
    let url = format!("{}/resolve/{}", base_url(port), key);
    let resp = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to connect to courierd at {} — is it running?", url))?;

    if resp.status().as_u16() == 404 {
        println!("Unknown recipient — no route for {}", key);
        std::process::exit(2);
    }
    if !resp.status().is_success() {
        anyhow::bail!("daemon returned {} for {}", resp.status(), url);
    }

    let route: RouteInfo = resp.json().await.context("failed to parse response")?;
    println!("{} -> {}", &route.recipient[..16], route.addr);

    Ok(())
}

fn print_usage() {
    println!("Usage: courier-ctl [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status           Show daemon status and directory summary");
    println!("  peers            List known peer addresses");
    println!("  routes           List recipient-to-node routes");
    println!("  resolve <key>    Resolve a recipient key (64 hex chars)");
    println!();
    println!("Options:");
    println!("  --port <port>   Diagnostics API port (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --port option
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--port" {
            i += 1;
            port = args
                .get(i)
                .context("--port requires a value")?
                .parse()
                .context("--port must be a number")?;
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["status"] | []                => cmd_status(port).await,
        ["peers"]                      => cmd_peers(port).await,
        ["routes"]                     => cmd_routes(port).await,
        ["resolve", key]               => cmd_resolve(port, key).await,
        ["help"] | ["--help"] | ["-h"] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
