//! /status, /peers, /routes, /resolve handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use courier_core::RecipientKey;
use courier_directory::NodeDirectory;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    pub directory: Arc<NodeDirectory>,
    pub public_key: RecipientKey,
    pub started_at: Instant,
}

// ── /status ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusResponse {
    pub own_addr: String,
    pub public_key: String,
    pub peers_known: usize,
    pub routes_known: usize,
    pub digest: String,
    pub uptime_secs: u64,
}

pub async fn handle_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let snapshot = state.directory.snapshot();
    Json(StatusResponse {
        own_addr: snapshot.own.to_string(),
        public_key: state.public_key.to_string(),
        peers_known: snapshot.peers.len(),
        routes_known: snapshot.routes.len(),
        digest: hex::encode(snapshot.digest()),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

// ── /peers ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PeersResponse {
    pub peers: Vec<String>,
}

pub async fn handle_peers(State(state): State<ApiState>) -> Json<PeersResponse> {
    let mut peers: Vec<String> = state
        .directory
        .peer_addrs()
        .iter()
        .map(|a| a.to_string())
        .collect();
    peers.sort();
    Json(PeersResponse { peers })
}

// ── /routes ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteInfo>,
}

#[derive(Serialize)]
pub struct RouteInfo {
    pub recipient: String,
    pub addr: String,
}

pub async fn handle_routes(State(state): State<ApiState>) -> Json<RoutesResponse> {
    let mut routes: Vec<RouteInfo> = state
        .directory
        .routes()
        .iter()
        .map(|(recipient, addr)| RouteInfo {
            recipient: recipient.to_string(),
            addr: addr.to_string(),
        })
        .collect();
    routes.sort_by(|a, b| a.recipient.cmp(&b.recipient));
    Json(RoutesResponse { routes })
}

// ── /resolve/{key} ────────────────────────────────────────────────────────────

/// An unknown recipient is a routable miss, not a server fault: 404 with
/// the error in the body, never a 500.
pub async fn handle_resolve(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Response {
    let recipient = match key.parse::<RecipientKey>() {
        Ok(recipient) => recipient,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response();
        }
    };

    match state.directory.resolve(&recipient) {
        Ok(addr) => Json(RouteInfo {
            recipient: recipient.to_string(),
            addr: addr.to_string(),
        })
        .into_response(),
        Err(e) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
