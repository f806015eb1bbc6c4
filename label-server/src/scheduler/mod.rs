//! Print batch scheduling
//!
//! Turns a committed selection into sequential three-slot device
//! batches, with progress events, partial-failure reporting and a
//! durable run history.

pub mod batch;
pub mod device;
pub mod history;
#[allow(clippy::module_inception)]
pub mod scheduler;

pub use batch::{flatten, partition};
pub use device::{BatchDevice, DeviceError, DeviceResult, MockDevice, PplbDevice};
pub use history::{HistoryError, PrintHistory, PrintRunRecord};
pub use scheduler::{PrintOutcome, PrintProgress, PrintScheduler, SchedulerError};
