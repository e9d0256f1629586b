//! API route handlers
//!
//! - `reconcile`: the OpenRefine reconciliation endpoint and property suggest
//! - `health`: liveness, readiness and metrics

pub mod health;
pub mod reconcile;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// API version and base info
///
/// ```json
/// {
///   "name": "filmrecon-server",
///   "version": "0.1.0",
///   "service": "TMDB Movie Reconciliation",
///   "catalog": "tmdb",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "filmrecon-server",
        "version": env!("CARGO_PKG_VERSION"),
        "service": state.manifest.name,
        "catalog": state.reconciler.catalog_name(),
        "endpoints": [
            "/reconcile",
            "/suggest/properties",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
