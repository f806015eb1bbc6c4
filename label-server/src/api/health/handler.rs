//! Health API handlers

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether a printer identity is resolved for this session
    pub printer_selected: bool,
}

/// GET /api/health
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<AppResponse<HealthStatus>>> {
    let printer_selected = state.identity_store.resolved_identity().await.is_some();
    Ok(ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        printer_selected,
    }))
}
