//! Printer identity store - session truth reconciled across tiers
//!
//! Holds the session-visible printer identity, rebuilt at startup
//! from the backend and cache tiers (with heal writes for whichever
//! tier lost), and updated optimistically on selection: the session
//! and cache change synchronously, the backend write and the device
//! connect run in the background and never revert the selection.

use super::backend::SettingsBackend;
use super::cache::PrinterCacheStore;
use super::discovery::DiscoveryService;
use super::notify::Notifier;
use super::reconcile::{ReconcileSource, reconcile};
use shared::{NotificationLevel, PrinterConfig, PrinterIdentity};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No printer selected")]
    NotConfigured,
}

/// Lifecycle of the most recent backend persistence attempt.
///
/// Makes the optimistic write's eventual-consistency window
/// observable instead of silently swallowing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteState {
    Idle,
    Pending,
    Confirmed,
    Failed,
}

struct SessionState {
    identity: Option<PrinterIdentity>,
    backend_write: WriteState,
}

#[derive(Clone)]
pub struct PrinterIdentityStore {
    session: Arc<RwLock<SessionState>>,
    cache: PrinterCacheStore,
    backend: Arc<dyn SettingsBackend>,
    discovery: DiscoveryService,
    notifier: Notifier,
}

impl PrinterIdentityStore {
    pub fn new(
        cache: PrinterCacheStore,
        backend: Arc<dyn SettingsBackend>,
        discovery: DiscoveryService,
        notifier: Notifier,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(SessionState {
                identity: None,
                backend_write: WriteState::Idle,
            })),
            cache,
            backend,
            discovery,
            notifier,
        }
    }

    /// Startup reconciliation. Runs once per session before any print
    /// action is allowed.
    pub async fn initialize(&self) {
        let backend_snapshot = match self.backend.get_printer_settings().await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Backend settings unavailable, falling back to cache");
                self.notifier.notify(
                    NotificationLevel::Warning,
                    "backend-read",
                    "Backend unavailable, using cached printer settings",
                );
                None
            }
        };

        let cache_snapshot = match self.cache.get_selected() {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Printer cache unreadable");
                None
            }
        };

        // Discovery only matters when both durable tiers are empty.
        let discovered = if backend_snapshot.is_none() && cache_snapshot.is_none() {
            self.discovery.discover(false).await.unwrap_or_default()
        } else {
            Vec::new()
        };

        let outcome = reconcile(backend_snapshot, cache_snapshot, &discovered);

        if let Some(identity) = &outcome.identity {
            info!(printer = %identity.name, source = ?outcome.source, "Printer identity resolved");

            if outcome.heal_cache
                && let Err(e) = self.cache.set_selected(identity)
            {
                warn!(error = %e, "Failed to heal printer cache");
            }

            if outcome.heal_backend {
                self.set_write_state(WriteState::Pending).await;
                match self.backend.save_printer_settings(identity).await {
                    Ok(()) => self.set_write_state(WriteState::Confirmed).await,
                    Err(e) => {
                        warn!(error = %e, "Failed to heal backend printer settings");
                        self.notifier.notify(
                            NotificationLevel::Warning,
                            "backend-write",
                            "Could not persist printer selection to backend",
                        );
                        self.set_write_state(WriteState::Failed).await;
                    }
                }
            }
        } else {
            info!("No printer available, printing is blocked until one is selected");
        }

        let mut session = self.session.write().await;
        session.identity = outcome.identity;

        if outcome.source == ReconcileSource::Discovered {
            self.notifier.notify(
                NotificationLevel::Info,
                "discovery-default",
                "Defaulted to first discovered printer",
            );
        }
    }

    /// Snapshot of the session-visible identity.
    pub async fn resolved_identity(&self) -> Option<PrinterIdentity> {
        self.session.read().await.identity.clone()
    }

    pub async fn backend_write_state(&self) -> WriteState {
        self.session.read().await.backend_write
    }

    /// Select a printer by name.
    ///
    /// Session and cache update synchronously; backend persistence and
    /// the device connect run in the returned background task. Their
    /// failure is surfaced as a notification and never reverts the
    /// selection.
    pub async fn select_printer(&self, name: &str) -> JoinHandle<()> {
        let identity = {
            let mut session = self.session.write().await;
            // Re-selecting keeps the tuned parameters.
            let config = match &session.identity {
                Some(current) => current.config.clone(),
                None => PrinterConfig::default(),
            };
            let identity = PrinterIdentity::with_config(name, config);
            session.identity = Some(identity.clone());
            session.backend_write = WriteState::Pending;
            identity
        };

        info!(printer = %name, "Printer selected");

        if let Err(e) = self.cache.set_selected(&identity) {
            warn!(error = %e, "Failed to write printer selection to cache");
            self.notifier.notify(
                NotificationLevel::Warning,
                "cache-write",
                "Could not cache printer selection",
            );
        }

        self.spawn_persist(identity)
    }

    /// Update tunable parameters in session memory only.
    ///
    /// Interactive edits land here on every change; nothing is pushed
    /// to the durable tiers until [`save_config`](Self::save_config).
    pub async fn update_config(&self, config: PrinterConfig) -> Result<(), StoreError> {
        let mut session = self.session.write().await;
        match &mut session.identity {
            Some(identity) => {
                identity.config = config;
                Ok(())
            }
            None => Err(StoreError::NotConfigured),
        }
    }

    /// Push the current identity to cache and backend (explicit save).
    pub async fn save_config(&self) -> Result<JoinHandle<()>, StoreError> {
        let identity = {
            let mut session = self.session.write().await;
            let identity = session.identity.clone().ok_or(StoreError::NotConfigured)?;
            session.backend_write = WriteState::Pending;
            identity
        };

        if let Err(e) = self.cache.set_selected(&identity) {
            warn!(error = %e, "Failed to write printer settings to cache");
        }

        Ok(self.spawn_persist(identity))
    }

    /// Retry the backend write after a [`WriteState::Failed`].
    pub async fn retry_persist(&self) -> Result<JoinHandle<()>, StoreError> {
        self.save_config().await
    }

    fn spawn_persist(&self, identity: PrinterIdentity) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let result = async {
                store.backend.save_printer_settings(&identity).await?;
                store.backend.connect_printer(&identity).await
            }
            .await;

            match result {
                Ok(()) => {
                    info!(printer = %identity.name, "Printer selection persisted");
                    store.set_write_state(WriteState::Confirmed).await;
                }
                Err(e) => {
                    warn!(printer = %identity.name, error = %e, "Printer persistence failed");
                    store.notifier.notify(
                        NotificationLevel::Warning,
                        "backend-write",
                        format!("Could not persist printer '{}' to backend", identity.name),
                    );
                    store.set_write_state(WriteState::Failed).await;
                }
            }
        })
    }

    async fn set_write_state(&self, state: WriteState) {
        self.session.write().await.backend_write = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printers::backend::{BackendError, BackendResult};
    use crate::printers::discovery::{DiscoveryError, DiscoveryResult, PrinterEnumerator};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockBackend {
        stored: Mutex<Option<PrinterIdentity>>,
        saves: Mutex<Vec<PrinterIdentity>>,
        connects: AtomicUsize,
        fail_writes: bool,
    }

    impl MockBackend {
        fn empty() -> Arc<Self> {
            Self::with_stored(None, false)
        }

        fn with_stored(stored: Option<PrinterIdentity>, fail_writes: bool) -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(stored),
                saves: Mutex::new(Vec::new()),
                connects: AtomicUsize::new(0),
                fail_writes,
            })
        }

        fn saved(&self) -> Vec<PrinterIdentity> {
            self.saves.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SettingsBackend for MockBackend {
        async fn get_printer_settings(&self) -> BackendResult<Option<PrinterIdentity>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save_printer_settings(&self, identity: &PrinterIdentity) -> BackendResult<()> {
            if self.fail_writes {
                return Err(BackendError::Rejected("backend down".into()));
            }
            self.saves.lock().unwrap().push(identity.clone());
            *self.stored.lock().unwrap() = Some(identity.clone());
            Ok(())
        }

        async fn connect_printer(&self, _identity: &PrinterIdentity) -> BackendResult<()> {
            if self.fail_writes {
                return Err(BackendError::Unreachable("backend down".into()));
            }
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FixedEnumerator(Vec<String>);

    #[async_trait]
    impl PrinterEnumerator for FixedEnumerator {
        async fn enumerate(&self) -> DiscoveryResult<Vec<String>> {
            if self.0.is_empty() {
                return Err(DiscoveryError::Enumeration("no printers".into()));
            }
            Ok(self.0.clone())
        }
    }

    fn build_store(
        backend: Arc<MockBackend>,
        cache: PrinterCacheStore,
        discovered: Vec<&str>,
    ) -> PrinterIdentityStore {
        let enumerator = Arc::new(FixedEnumerator(
            discovered.into_iter().map(String::from).collect(),
        ));
        let discovery = DiscoveryService::new(enumerator, cache.clone());
        PrinterIdentityStore::new(cache, backend, discovery, Notifier::new())
    }

    #[tokio::test]
    async fn test_backend_wins_and_heals_cache() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        cache
            .set_selected(&PrinterIdentity::new("Argox-OS2140"))
            .unwrap();
        let backend = MockBackend::with_stored(Some(PrinterIdentity::new("HP-Thermal")), false);

        let store = build_store(backend, cache.clone(), vec![]);
        store.initialize().await;

        let identity = store.resolved_identity().await.unwrap();
        assert_eq!(identity.name, "HP-Thermal");
        assert_eq!(cache.get_selected().unwrap().unwrap().name, "HP-Thermal");
    }

    #[tokio::test]
    async fn test_cache_heals_backend() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        cache
            .set_selected(&PrinterIdentity::new("Argox-OS2140"))
            .unwrap();
        let backend = MockBackend::empty();

        let store = build_store(backend.clone(), cache, vec![]);
        store.initialize().await;

        let identity = store.resolved_identity().await.unwrap();
        assert_eq!(identity.name, "Argox-OS2140");
        assert_eq!(backend.saved().len(), 1);
        assert_eq!(backend.saved()[0].name, "Argox-OS2140");
        assert_eq!(store.backend_write_state().await, WriteState::Confirmed);
    }

    #[tokio::test]
    async fn test_discovery_default_is_not_persisted() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let backend = MockBackend::empty();

        let store = build_store(backend.clone(), cache.clone(), vec!["HP-Thermal"]);
        store.initialize().await;

        let identity = store.resolved_identity().await.unwrap();
        assert_eq!(identity.name, "HP-Thermal");
        assert!(backend.saved().is_empty());
        assert!(cache.get_selected().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_tiers_leave_identity_unset() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let store = build_store(MockBackend::empty(), cache, vec![]);
        store.initialize().await;

        assert!(store.resolved_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_select_printer_is_optimistic_on_backend_failure() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let backend = MockBackend::with_stored(None, true);

        let store = build_store(backend, cache.clone(), vec![]);
        store.initialize().await;

        let persist = store.select_printer("HP-Thermal").await;

        // Session and cache reflect the selection immediately.
        assert_eq!(store.resolved_identity().await.unwrap().name, "HP-Thermal");
        assert_eq!(cache.get_selected().unwrap().unwrap().name, "HP-Thermal");

        persist.await.unwrap();

        // Backend write failed, selection stands, state is observable.
        assert_eq!(store.resolved_identity().await.unwrap().name, "HP-Thermal");
        assert_eq!(store.backend_write_state().await, WriteState::Failed);
    }

    #[tokio::test]
    async fn test_select_printer_persists_and_connects() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let backend = MockBackend::empty();

        let store = build_store(backend.clone(), cache, vec![]);
        store.initialize().await;

        store.select_printer("HP-Thermal").await.await.unwrap();

        assert_eq!(backend.saved().len(), 1);
        assert_eq!(backend.connects.load(Ordering::SeqCst), 1);
        assert_eq!(store.backend_write_state().await, WriteState::Confirmed);
    }

    #[tokio::test]
    async fn test_reselect_keeps_tuned_config() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let store = build_store(MockBackend::empty(), cache, vec![]);
        store.initialize().await;

        store.select_printer("HP-Thermal").await.await.unwrap();
        let mut config = PrinterConfig::default();
        config.darkness = 12;
        store.update_config(config).await.unwrap();

        store.select_printer("Argox-OS2140").await.await.unwrap();

        let identity = store.resolved_identity().await.unwrap();
        assert_eq!(identity.name, "Argox-OS2140");
        assert_eq!(identity.config.darkness, 12);
    }

    #[tokio::test]
    async fn test_update_config_without_printer_fails() {
        let cache = PrinterCacheStore::open_in_memory().unwrap();
        let store = build_store(MockBackend::empty(), cache, vec![]);
        store.initialize().await;

        let result = store.update_config(PrinterConfig::default()).await;
        assert_eq!(result, Err(StoreError::NotConfigured));
        assert!(store.save_config().await.is_err());
    }
}
