//! Print API module
//!
//! Print run submission, progress stream and history.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/print", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::print))
        .route("/history", get(handler::history))
        .route("/progress", get(handler::progress))
}
