//! Printer Settings API handlers
//!
//! Tunable printer parameters (darkness, dimensions, speed, port).
//! Edits stay in session memory until the explicit save.

use axum::Json;
use axum::extract::State;
use shared::PrinterConfig;

use crate::core::ServerState;
use crate::printers::StoreError;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotConfigured => AppError::Configuration("No printer selected".into()),
        }
    }
}

/// GET /api/printer-settings
///
/// Returns the session printer config, `null` while no printer is
/// selected.
pub async fn get(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Option<PrinterConfig>>>> {
    let config = state
        .identity_store
        .resolved_identity()
        .await
        .map(|identity| identity.config);
    Ok(ok(config))
}

/// PUT /api/printer-settings
///
/// Update the session config without persisting (interactive edits).
pub async fn update(
    State(state): State<ServerState>,
    Json(config): Json<PrinterConfig>,
) -> AppResult<Json<AppResponse<PrinterConfig>>> {
    state.identity_store.update_config(config.clone()).await?;
    Ok(ok(config))
}

/// POST /api/printer-settings/save
///
/// Explicit save: push the session config to cache and backend.
pub async fn save(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Option<PrinterConfig>>>> {
    // Persistence runs in the background; failures surface as
    // notifications and in the write state.
    let _ = state.identity_store.save_config().await?;

    let config = state
        .identity_store
        .resolved_identity()
        .await
        .map(|identity| identity.config);
    Ok(ok_with_message(config, "Saving printer settings"))
}
