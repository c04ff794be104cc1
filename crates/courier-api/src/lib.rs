//! courier-api — read-only diagnostics surface over the node directory.
//!
//! Everything served here works on directory snapshots: inspection can
//! never corrupt live routing state.

pub mod handlers;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

/// Build the diagnostics router.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(handlers::handle_status))
        .route("/peers", get(handlers::handle_peers))
        .route("/routes", get(handlers::handle_routes))
        .route("/resolve/{key}", get(handlers::handle_resolve))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Serve the diagnostics API on localhost.
pub async fn serve(state: ApiState, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!(port, "diagnostics API listening on 127.0.0.1");
    axum::serve(listener, app).await?;
    Ok(())
}
