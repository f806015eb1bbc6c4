//! Data models
//!
//! Shared between label-server and the UI (via API).
//! All product IDs are `i64` (SQLite INTEGER PRIMARY KEY in the catalog).

pub mod batch;
pub mod printer;
pub mod product;
pub mod selection;

// Re-exports
pub use batch::*;
pub use printer::*;
pub use product::*;
pub use selection::*;
