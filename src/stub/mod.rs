//! In-process stand-in for the spreadsheet backend.
//!
//! Serves the same action-based contract at `/exec` from in-memory
//! repositories, with switchable faults for exercising client error paths.

// Public API - what other modules can use
pub use state::{StubFault, StubState};

mod handlers;
mod state;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Path the endpoint is mounted at, mirroring deployed script URLs
pub const STUB_PATH: &str = "/exec";

pub fn router(state: StubState) -> Router {
    Router::new()
        .route(
            STUB_PATH,
            get(handlers::handle_get).post(handlers::handle_post),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the stub on an already-bound listener until the task is dropped
pub async fn serve(listener: TcpListener, state: StubState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Stub backend running on http://{}{}", addr, STUB_PATH);
    }
    axum::serve(listener, router(state)).await
}
