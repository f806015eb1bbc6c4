//! # label-printer
//!
//! Label printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - PPLB command building (Argox OS-2140 family)
//! - Network printing (TCP port 9100)
//! - Mock printer for development without hardware
//!
//! Business logic (WHAT to print) stays in application code:
//! - Label rendering and batch scheduling → label-server
//!
//! ## Example
//!
//! ```ignore
//! use label_printer::{NetworkPrinter, PplbBuilder, Printer};
//!
//! // Build a label format
//! let mut builder = PplbBuilder::new(840, 176, 2, 8);
//! builder.text_field(50, 24, "ESTRELA METAIS");
//! builder.ean13_field(50, 96, "789846581577");
//! builder.quantity(1);
//!
//! // Send to network printer
//! let printer = NetworkPrinter::new("192.168.1.100", 9100);
//! printer.print(&builder.build()).await?;
//! ```

mod error;
mod pplb;
mod printer;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use pplb::PplbBuilder;
pub use printer::{MockPrinter, NetworkPrinter, Printer};
