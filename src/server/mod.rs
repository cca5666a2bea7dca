//! HTTP front-end: the trip form page plus two JSON action endpoints.

mod handlers;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{error::Result, flows::FlowRunner};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub(crate) struct AppState {
    runner: Arc<FlowRunner>,
}

pub fn router(runner: Arc<FlowRunner>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::health))
        .route("/api/itinerary", post(handlers::generate))
        .route("/api/itinerary/adjust", post(handlers::adjust))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { runner })
}

/// Serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(addr: SocketAddr, runner: Arc<FlowRunner>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        target: "wanderplan::server",
        addr = %listener.local_addr()?,
        model = runner.model(),
        "listening"
    );

    axum::serve(listener, router(runner))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: "wanderplan::server", "server has been shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!(target: "wanderplan::server", "starting graceful shutdown");
}
