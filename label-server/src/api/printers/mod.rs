//! Printers API module
//!
//! Discovery, selection and persistence state.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/printers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/selected", get(handler::selected).put(handler::select))
        .route("/write-state", get(handler::write_state))
        .route("/retry-persist", post(handler::retry_persist))
}
