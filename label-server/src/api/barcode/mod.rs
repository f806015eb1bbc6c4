//! Barcode API module
//!
//! EAN-13 encoding and in-house code generation.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/barcode", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/encode", post(handler::encode))
        .route("/generate", post(handler::generate))
}
