//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`barcode`] - EAN-13 encoding and code generation
//! - [`printers`] - discovery and selection
//! - [`settings`] - tunable printer parameters
//! - [`print`] - print runs, progress and history
//! - [`notifications`] - operator notification stream

pub mod barcode;
pub mod health;
pub mod notifications;
pub mod print;
pub mod printers;
pub mod settings;

use axum::Router;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(barcode::router())
        .merge(printers::router())
        .merge(settings::router())
        .merge(print::router())
        .merge(notifications::router())
}

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
