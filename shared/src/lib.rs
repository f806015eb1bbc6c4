//! Shared types for the label station
//!
//! Domain models used across the server and device crates: products,
//! print selections, batches, and printer identity.

pub mod models;
pub mod notification;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    PrintBatch, PrintSlot, PrinterConfig, PrinterIdentity, Product, ProductValidationError,
    SelectedProduct, SelectionError, SelectionMap, BATCH_SLOTS, MAX_SHORT_NAME_LEN,
};
pub use notification::{Notification, NotificationLevel};
