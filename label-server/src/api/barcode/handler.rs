//! Barcode API handlers

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::barcode::{self, BarcodeError, EncodedBarcode};
use crate::utils::{AppError, AppResponse, AppResult, ok};

impl From<BarcodeError> for AppError {
    fn from(e: BarcodeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct EncodeRequest {
    pub code: String,
}

/// POST /api/barcode/encode
///
/// Returns the full 13-digit code and the 95-module bar pattern.
pub async fn encode(
    Json(request): Json<EncodeRequest>,
) -> AppResult<Json<AppResponse<EncodedBarcode>>> {
    let encoded = barcode::encode(&request.code)?;
    Ok(ok(encoded))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The most recently issued barcode, if any
    pub last_barcode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub barcode: String,
}

/// POST /api/barcode/generate
///
/// Derives the next in-house barcode from the last issued one.
pub async fn generate(
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<AppResponse<GenerateResponse>>> {
    let barcode = barcode::generate_next(request.last_barcode.as_deref())?;
    Ok(ok(GenerateResponse { barcode }))
}
