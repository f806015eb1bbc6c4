use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{Result, ServerError};
use crate::core::Config;
use crate::printers::{
    DiscoveryService, HttpSettingsBackend, Notifier, PrinterCacheStore, PrinterIdentityStore,
    ProbeEnumerator,
};
use crate::scheduler::{BatchDevice, MockDevice, PplbDevice, PrintHistory, PrintScheduler};

/// Server state - shared handles to every service
///
/// Cheap to clone; all fields are `Arc`-backed.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Immutable configuration |
/// | notifier | Operator notification hub |
/// | discovery | Freshness-gated printer discovery |
/// | identity_store | Selected-printer reconciliation |
/// | scheduler | Sequential batch scheduler |
/// | history | Print run history (redb) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub notifier: Notifier,
    pub discovery: DiscoveryService,
    pub identity_store: PrinterIdentityStore,
    pub scheduler: Arc<PrintScheduler>,
    pub history: PrintHistory,
}

impl ServerState {
    /// Build all services and run the startup reconciliation.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let cache = PrinterCacheStore::open(config.cache_path())?;
        let history = PrintHistory::open(config.history_path())?;

        let backend = HttpSettingsBackend::new(
            &config.backend_url,
            Duration::from_millis(config.request_timeout_ms),
        )
        .map_err(|e| ServerError::Config(format!("backend client: {e}")))?;

        let enumerator = Arc::new(ProbeEnumerator::new(
            config.printer_hosts.clone(),
            config.printer_port,
        ));
        let discovery = DiscoveryService::new(enumerator, cache.clone());

        let notifier = Notifier::new();

        let identity_store = PrinterIdentityStore::new(
            cache,
            Arc::new(backend),
            discovery.clone(),
            notifier.clone(),
        );

        // Resolve the session identity before the API comes up.
        identity_store.initialize().await;

        let device: Arc<dyn BatchDevice> = if config.use_mock_printer {
            tracing::warn!("Using mock print device, nothing will reach hardware");
            Arc::new(MockDevice::new())
        } else {
            Arc::new(PplbDevice::new(config.printer_port))
        };

        let scheduler = Arc::new(PrintScheduler::new(device, history.clone()));

        Ok(Self {
            config: config.clone(),
            notifier,
            discovery,
            identity_store,
            scheduler,
            history,
        })
    }
}
