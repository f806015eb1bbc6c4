//! Print API handlers
//!
//! Accepts a committed selection and runs it through the batch
//! scheduler. A run that fails partway still answers 200: the outcome
//! carries the printed count and the failed batch index so the
//! operator can resume manually.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Deserialize;
use shared::{Product, SelectedProduct, SelectionMap};
use std::convert::Infallible;
use tokio::sync::broadcast;

use crate::core::ServerState;
use crate::scheduler::{PrintOutcome, PrintProgress, PrintRunRecord, SchedulerError};
use crate::utils::{AppError, AppResponse, AppResult, ok};

impl From<SchedulerError> for AppError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::NoPrinter => AppError::Configuration("No printer selected".into()),
            SchedulerError::Selection(e) => AppError::Validation(e.to_string()),
            SchedulerError::History(e) => AppError::Persistence(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrintItem {
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct PrintRequest {
    /// Selection entries, in the order the operator added them
    pub items: Vec<PrintItem>,
}

/// POST /api/print
pub async fn print(
    State(state): State<ServerState>,
    Json(request): Json<PrintRequest>,
) -> AppResult<Json<AppResponse<PrintOutcome>>> {
    let mut selection = SelectionMap::new();
    for item in request.items {
        item.product
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let id = item
            .product
            .id
            .ok_or_else(|| AppError::Validation("Product has no id".into()))?;
        selection.insert(id, SelectedProduct::new(item.product, item.quantity));
    }

    let identity = state
        .identity_store
        .resolved_identity()
        .await
        .ok_or_else(|| AppError::Configuration("No printer selected".into()))?;

    let outcome = state.scheduler.print_selection(&selection, &identity).await?;
    Ok(ok(outcome))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    20
}

/// GET /api/print/history
pub async fn history(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<AppResponse<Vec<PrintRunRecord>>>> {
    let runs = state
        .history
        .list_recent(query.limit)
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    Ok(ok(runs))
}

/// GET /api/print/progress
///
/// Server-sent events: one event per completed batch of the run in
/// flight, `{printed, total}`.
pub async fn progress(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.scheduler.subscribe_progress();
    Sse::new(progress_stream(rx)).keep_alive(KeepAlive::default())
}

fn progress_stream(
    rx: broadcast::Receiver<PrintProgress>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(progress) => match Event::default().json_data(progress) {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(_) => continue,
                },
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::printers::{
        DiscoveryService, HttpSettingsBackend, Notifier, PrinterCacheStore, PrinterIdentityStore,
        ProbeEnumerator,
    };
    use crate::scheduler::{BatchDevice, DeviceError, DeviceResult, PrintHistory, PrintScheduler};
    use async_trait::async_trait;
    use label_printer::PrintError;
    use shared::{PrintBatch, PrinterIdentity};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Succeeds until `fail_at`, then errors like a dropped connection.
    struct FlakyDevice {
        calls: AtomicUsize,
        fail_at: usize,
    }

    #[async_trait]
    impl BatchDevice for FlakyDevice {
        async fn dispatch_batch(
            &self,
            _batch: &PrintBatch,
            _identity: &PrinterIdentity,
        ) -> DeviceResult<()> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if index == self.fail_at {
                return Err(DeviceError::Print(PrintError::Connection(
                    "printer went away".into(),
                )));
            }
            Ok(())
        }
    }

    async fn state_with_device(device: Arc<dyn BatchDevice>) -> ServerState {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let history = PrintHistory::open_in_memory().unwrap();
        let discovery = DiscoveryService::new(
            Arc::new(ProbeEnumerator::new(Vec::new(), 9100)),
            cache.clone(),
        );
        let notifier = Notifier::new();
        let backend = HttpSettingsBackend::new("http://127.0.0.1:1", Duration::from_millis(200))
            .unwrap();
        let identity_store = PrinterIdentityStore::new(
            cache,
            Arc::new(backend),
            discovery.clone(),
            notifier.clone(),
        );
        let scheduler = Arc::new(
            PrintScheduler::new(device, history.clone())
                .with_inter_batch_delay(Duration::ZERO),
        );

        let state = ServerState {
            config: Config::with_overrides("/tmp", 0),
            notifier,
            discovery,
            identity_store,
            scheduler,
            history,
        };

        // Selection sticks in the session even though the backend
        // persist fails; that is the optimistic contract.
        let persist = state.identity_store.select_printer("HP-Thermal").await;
        let _ = persist.await;
        state
    }

    fn product(id: i64, code: &str) -> Product {
        Product {
            id: Some(id),
            product_code: code.to_string(),
            name: format!("Product {code}"),
            name_short: format!("P{code}"),
            barcode: "7898465815771".to_string(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_partial_run_answers_ok_with_outcome() {
        let device = Arc::new(FlakyDevice {
            calls: AtomicUsize::new(0),
            fail_at: 1,
        });
        let state = state_with_device(device).await;

        let request = PrintRequest {
            items: vec![
                PrintItem {
                    product: product(1, "0001"),
                    quantity: 4,
                },
                PrintItem {
                    product: product(2, "0002"),
                    quantity: 2,
                },
            ],
        };

        let response = print(State(state), Json(request)).await.unwrap();
        let outcome = response.0.data.unwrap();

        assert_eq!(outcome.total_labels, 6);
        assert_eq!(outcome.printed_count, 3);
        assert_eq!(outcome.failed_at_batch_index, Some(1));
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_print_without_selection_is_a_configuration_error() {
        let device = Arc::new(FlakyDevice {
            calls: AtomicUsize::new(0),
            fail_at: usize::MAX,
        });
        let state = state_with_device(device.clone()).await;
        // Forget the selection again: fresh state, nothing selected.
        let state = ServerState {
            identity_store: PrinterIdentityStore::new(
                PrinterCacheStore::open_in_memory().unwrap(),
                Arc::new(
                    HttpSettingsBackend::new("http://127.0.0.1:1", Duration::from_millis(200))
                        .unwrap(),
                ),
                state.discovery.clone(),
                state.notifier.clone(),
            ),
            ..state
        };

        let request = PrintRequest {
            items: vec![PrintItem {
                product: product(1, "0001"),
                quantity: 1,
            }],
        };

        let result = print(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
        assert_eq!(device.calls.load(Ordering::SeqCst), 0);
    }
}
