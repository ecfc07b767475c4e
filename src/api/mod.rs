//! REST API for chain inspection and audit.
//!
//! Provides three GET endpoints:
//! - `/state` — scenario config, chain summary, and latest record
//! - `/chain` — full record chain with optional index range filtering
//! - `/validate` — integrity audit verdict for the served chain

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::chain::record::Record;
use crate::chain::validator::{self, ValidationResult};
use crate::config::ScenarioConfig;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc` — no locks needed since all data is read-only.
pub struct AppState {
    /// Scenario configuration used for this run.
    pub scenario: ScenarioConfig,
    /// Complete record chain, in chain order.
    pub records: Vec<Record>,
    /// Audit verdict computed over `records` at construction time.
    pub validation: ValidationResult,
}

impl AppState {
    /// Builds the shared state, auditing the chain once up front.
    pub fn new(scenario: ScenarioConfig, records: Vec<Record>) -> Self {
        let validation = validator::validate(&records);
        Self { scenario, records, validation }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/chain", get(handlers::get_chain))
        .route("/validate", get(handlers::get_validate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
