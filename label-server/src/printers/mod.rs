//! Printer identity management
//!
//! Reconciles "which printer is selected" across three tiers:
//! the backend store (authoritative), the redb cache (fast path)
//! and session memory (what the UI sees).

pub mod backend;
pub mod cache;
pub mod discovery;
pub mod notify;
pub mod reconcile;
pub mod store;

pub use backend::{BackendError, HttpSettingsBackend, SettingsBackend};
pub use cache::{CachedPrinterList, PrinterCacheError, PrinterCacheStore};
pub use discovery::{
    DiscoveryError, DiscoveryResult, DiscoveryService, PrinterEnumerator, ProbeEnumerator,
};
pub use notify::Notifier;
pub use reconcile::{ReconcileOutcome, ReconcileSource, reconcile};
pub use store::{PrinterIdentityStore, StoreError, WriteState};
