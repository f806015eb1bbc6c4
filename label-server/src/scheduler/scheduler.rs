//! Sequential print batch scheduler
//!
//! Expands a committed selection into the flat label queue, partitions
//! it into three-slot device batches and dispatches them one at a
//! time. The device owns no queue of its own, so the run lock here is
//! the sole serialization point; a fixed delay between successful
//! batches respects the mechanical cycle. A failed batch halts the
//! run and the outcome reports the labels that did print.

use super::batch::{flatten, partition};
use super::device::BatchDevice;
use super::history::{HistoryError, PrintHistory, PrintRunRecord};
use serde::Serialize;
use shared::{PrinterIdentity, SelectionError, SelectionMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, broadcast};
use tracing::{error, info, warn};

/// Pause between successful device batches. Hardware constraint,
/// not configurable per call.
const INTER_BATCH_DELAY: Duration = Duration::from_millis(1000);

const PROGRESS_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No printer selected. Raised before any device call.
    #[error("No printer selected")]
    NoPrinter,

    #[error("Invalid selection: {0}")]
    Selection(#[from] SelectionError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Cumulative progress after each successful batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrintProgress {
    pub printed: usize,
    pub total: usize,
}

/// Final result of a print run. A failed run is not an error at this
/// level: labels already printed stay printed, and the caller decides
/// whether to resume manually from the failure point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintOutcome {
    pub run_id: String,
    pub total_labels: usize,
    pub printed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at_batch_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrintOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed_at_batch_index.is_none()
    }
}

pub struct PrintScheduler {
    device: Arc<dyn BatchDevice>,
    history: PrintHistory,
    progress: broadcast::Sender<PrintProgress>,
    run_lock: Mutex<()>,
    inter_batch_delay: Duration,
}

impl PrintScheduler {
    pub fn new(device: Arc<dyn BatchDevice>, history: PrintHistory) -> Self {
        let (progress, _) = broadcast::channel(PROGRESS_CHANNEL_CAPACITY);
        Self {
            device,
            history,
            progress,
            run_lock: Mutex::new(()),
            inter_batch_delay: INTER_BATCH_DELAY,
        }
    }

    /// Override the inter-batch delay. Test hook only.
    #[cfg(test)]
    pub fn with_inter_batch_delay(mut self, delay: Duration) -> Self {
        self.inter_batch_delay = delay;
        self
    }

    pub fn subscribe_progress(&self) -> broadcast::Receiver<PrintProgress> {
        self.progress.subscribe()
    }

    /// Print a committed selection on the given printer.
    ///
    /// The identity is a snapshot: changing the selected printer while
    /// a run is in flight does not affect it. The scheduler never
    /// mutates the selection; on full success the caller clears it.
    pub async fn print_selection(
        &self,
        selection: &SelectionMap,
        identity: &PrinterIdentity,
    ) -> SchedulerResult<PrintOutcome> {
        // Guard preconditions before any side effect.
        if identity.name.trim().is_empty() {
            return Err(SchedulerError::NoPrinter);
        }
        selection.validate_committed()?;

        // One job in flight at a time; later callers queue here.
        let _run = self.run_lock.lock().await;

        let queue = flatten(selection);
        let batches = partition(&queue);
        let total = queue.len();

        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now().timestamp_millis();
        info!(
            run_id = %run_id,
            printer = %identity.name,
            labels = total,
            batches = batches.len(),
            "Print run starting"
        );

        let mut printed_count = 0;
        let mut failed_at_batch_index = None;
        let mut dispatch_error = None;

        for (index, batch) in batches.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.inter_batch_delay).await;
            }

            match self.device.dispatch_batch(batch, identity).await {
                Ok(()) => {
                    printed_count += batch.label_count();
                    let _ = self.progress.send(PrintProgress {
                        printed: printed_count,
                        total,
                    });
                }
                Err(e) => {
                    error!(
                        run_id = %run_id,
                        batch_index = index,
                        error = %e,
                        "Batch dispatch failed, halting run"
                    );
                    failed_at_batch_index = Some(index);
                    dispatch_error = Some(e.to_string());
                    break;
                }
            }
        }

        let outcome = PrintOutcome {
            run_id: run_id.clone(),
            total_labels: total,
            printed_count,
            failed_at_batch_index,
            error: dispatch_error,
        };

        let record = PrintRunRecord {
            id: run_id,
            printer_name: identity.name.clone(),
            started_at,
            finished_at: chrono::Utc::now().timestamp_millis(),
            total_labels: total,
            printed_count,
            failed_at_batch_index,
            product_codes: queue.iter().map(|p| p.product_code.clone()).collect(),
        };
        if let Err(e) = self.history.record(&record) {
            warn!(error = %e, "Failed to record print run");
        }

        info!(
            run_id = %outcome.run_id,
            printed = outcome.printed_count,
            complete = outcome.is_complete(),
            "Print run finished"
        );
        Ok(outcome)
    }

    pub fn history(&self) -> &PrintHistory {
        &self.history
    }
}
