//! Estrela label server - label print orchestration for the catalog
//!
//! # Architecture
//!
//! - **Barcode** (`barcode`): EAN-13 check digit, 95-module pattern,
//!   in-house code generation
//! - **Printer identity** (`printers`): reconciliation of the selected
//!   printer across backend, redb cache and session memory
//! - **Scheduling** (`scheduler`): sequential three-slot device batches
//!   with progress events and partial-failure reporting
//! - **HTTP API** (`api`): RESTful interface for the station UI
//!
//! # Module structure
//!
//! ```text
//! label-server/src/
//! ├── core/        # config, state, server, errors
//! ├── barcode/     # EAN-13 encoder
//! ├── printers/    # identity tiers, discovery, notifications
//! ├── scheduler/   # batching, dispatch, history
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # error envelope, logging
//! ```

pub mod api;
pub mod barcode;
pub mod core;
pub mod printers;
pub mod scheduler;
pub mod utils;

// Re-export common types
pub use crate::core::{Config, Server, ServerState};
pub use printers::{Notifier, PrinterIdentityStore};
pub use scheduler::{PrintOutcome, PrintScheduler};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, working directory, logging.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/estrela/label".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______     __            __
   / ____/____/ /_________  / /___ _
  / __/ / ___/ __/ ___/ _ \/ / __ `/
 / /___(__  / /_/ /  /  __/ / /_/ /
/_____/____/\__/_/   \___/_/\__,_/
   Label Server
    "#
    );
}
