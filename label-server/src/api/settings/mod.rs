//! Printer Settings API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/printer-settings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get).put(handler::update))
        .route("/save", post(handler::save))
}
