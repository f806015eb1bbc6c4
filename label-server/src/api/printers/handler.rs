//! Printers API handlers
//!
//! Discovery and selection of the label printer.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::PrinterIdentity;

use crate::core::ServerState;
use crate::printers::WriteState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Bypass the discovery freshness gate (user hit "refresh")
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/printers
///
/// Lists discovered printers. A routine listing is served from cache
/// when fresh enough and never re-enumerates inside the silent
/// window; `?refresh=true` forces a new enumeration.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<String>>>> {
    let printers = state
        .discovery
        .discover(query.refresh)
        .await
        .map_err(|e| AppError::Device(e.to_string()))?;
    Ok(ok(printers))
}

/// GET /api/printers/selected
pub async fn selected(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Option<PrinterIdentity>>>> {
    Ok(ok(state.identity_store.resolved_identity().await))
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub name: String,
}

/// PUT /api/printers/selected
///
/// Optimistic selection: the response reflects the new session value
/// even while backend persistence is still in flight.
pub async fn select(
    State(state): State<ServerState>,
    Json(request): Json<SelectRequest>,
) -> AppResult<Json<AppResponse<PrinterIdentity>>> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Printer name must not be empty".into()));
    }

    // Fire-and-forget: the handle is dropped, failures surface as
    // notifications and in the write state.
    let _ = state.identity_store.select_printer(&request.name).await;

    let identity = state
        .identity_store
        .resolved_identity()
        .await
        .ok_or_else(|| AppError::Internal("Selection did not stick".into()))?;
    Ok(ok(identity))
}

#[derive(Debug, Serialize)]
pub struct WriteStateResponse {
    pub backend_write: WriteState,
}

/// GET /api/printers/write-state
///
/// Observability for the optimistic persistence window.
pub async fn write_state(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<WriteStateResponse>>> {
    Ok(ok(WriteStateResponse {
        backend_write: state.identity_store.backend_write_state().await,
    }))
}

/// POST /api/printers/retry-persist
///
/// Retry the backend write after a failure.
pub async fn retry_persist(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<WriteStateResponse>>> {
    state
        .identity_store
        .retry_persist()
        .await
        .map_err(|e| AppError::Configuration(e.to_string()))?;

    Ok(ok(WriteStateResponse {
        backend_write: state.identity_store.backend_write_state().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::printers::{
        DiscoveryService, DiscoveryResult, HttpSettingsBackend, Notifier, PrinterCacheStore,
        PrinterEnumerator, PrinterIdentityStore,
    };
    use crate::scheduler::{MockDevice, PrintHistory, PrintScheduler};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingEnumerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrinterEnumerator for CountingEnumerator {
        async fn enumerate(&self) -> DiscoveryResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["HP-Thermal".to_string()])
        }
    }

    fn state_with_enumerator(enumerator: Arc<CountingEnumerator>) -> ServerState {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let history = PrintHistory::open_in_memory().unwrap();
        let discovery = DiscoveryService::new(enumerator, cache.clone());
        let notifier = Notifier::new();
        let backend = HttpSettingsBackend::new("http://127.0.0.1:1", Duration::from_millis(200))
            .unwrap();
        let identity_store = PrinterIdentityStore::new(
            cache,
            Arc::new(backend),
            discovery.clone(),
            notifier.clone(),
        );
        let scheduler = Arc::new(PrintScheduler::new(Arc::new(MockDevice::new()), history.clone()));

        ServerState {
            config: Config::with_overrides("/tmp", 0),
            notifier,
            discovery,
            identity_store,
            scheduler,
            history,
        }
    }

    #[tokio::test]
    async fn test_back_to_back_listings_enumerate_once() {
        let enumerator = Arc::new(CountingEnumerator {
            calls: AtomicUsize::new(0),
        });
        let state = state_with_enumerator(enumerator.clone());

        for _ in 0..2 {
            let response = list(State(state.clone()), Query(ListQuery { refresh: false }))
                .await
                .unwrap();
            assert_eq!(response.0.data, Some(vec!["HP-Thermal".to_string()]));
        }

        assert_eq!(enumerator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_listing_enumerates_again() {
        let enumerator = Arc::new(CountingEnumerator {
            calls: AtomicUsize::new(0),
        });
        let state = state_with_enumerator(enumerator.clone());

        list(State(state.clone()), Query(ListQuery { refresh: false }))
            .await
            .unwrap();
        list(State(state), Query(ListQuery { refresh: true }))
            .await
            .unwrap();

        assert_eq!(enumerator.calls.load(Ordering::SeqCst), 2);
    }
}
