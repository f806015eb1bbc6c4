//! Printer discovery with freshness-gated caching
//!
//! Enumeration is slow and makes printer lists flicker in the UI, so
//! results are cached in memory and in the redb tier. Inside a thirty
//! second window a cached list is served with no enumeration at all;
//! up to five minutes it is still served as-is while a background
//! enumeration refreshes it. An explicit refresh bypasses both gates.

use super::cache::{CachedPrinterList, PrinterCacheStore};
use async_trait::async_trait;
use label_printer::{NetworkPrinter, Printer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Serve cached results inside this window; refresh in background.
const FRESH_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Inside this window a routine caller triggers no enumeration at all.
const SILENT_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Enumeration failed: {0}")]
    Enumeration(String),
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Device/OS printer enumeration boundary.
#[async_trait]
pub trait PrinterEnumerator: Send + Sync {
    async fn enumerate(&self) -> DiscoveryResult<Vec<String>>;
}

/// Enumerates printers by probing configured hosts on the raw print
/// port. A host that accepts the TCP connection counts as a printer.
pub struct ProbeEnumerator {
    hosts: Vec<String>,
    port: u16,
}

impl ProbeEnumerator {
    pub fn new(hosts: Vec<String>, port: u16) -> Self {
        Self { hosts, port }
    }
}

#[async_trait]
impl PrinterEnumerator for ProbeEnumerator {
    async fn enumerate(&self) -> DiscoveryResult<Vec<String>> {
        let mut found = Vec::new();
        for host in &self.hosts {
            let printer = NetworkPrinter::new(host.clone(), self.port);
            if printer.is_online().await {
                found.push(host.clone());
            }
        }
        Ok(found)
    }
}

#[derive(Default)]
struct DiscoveryState {
    last: Option<CachedPrinterList>,
}

/// Freshness-gated discovery front of an enumerator.
#[derive(Clone)]
pub struct DiscoveryService {
    enumerator: Arc<dyn PrinterEnumerator>,
    cache: PrinterCacheStore,
    state: Arc<RwLock<DiscoveryState>>,
}

impl DiscoveryService {
    pub fn new(enumerator: Arc<dyn PrinterEnumerator>, cache: PrinterCacheStore) -> Self {
        Self {
            enumerator,
            cache,
            state: Arc::new(RwLock::new(DiscoveryState::default())),
        }
    }

    /// Discover printers.
    ///
    /// `refresh` bypasses the freshness gate entirely (user-initiated).
    /// Everything else is a routine listing: a cached list younger
    /// than the silent window comes back with no enumeration, an
    /// older-but-fresh one comes back immediately while a background
    /// enumeration updates it.
    pub async fn discover(&self, refresh: bool) -> DiscoveryResult<Vec<String>> {
        if !refresh {
            if let Some(entry) = self.cached_entry().await {
                let age = entry_age(&entry);

                if age < SILENT_WINDOW {
                    debug!(age_ms = age.as_millis() as u64, "Serving cached printers");
                    return Ok(entry.printers);
                }

                if age < FRESH_WINDOW {
                    debug!(
                        age_ms = age.as_millis() as u64,
                        "Serving cached printers, refreshing in background"
                    );
                    let service = self.clone();
                    tokio::spawn(async move {
                        let _ = service.enumerate_and_store().await;
                    });
                    return Ok(entry.printers);
                }
            }
        }

        match self.enumerate_and_store().await {
            Ok(printers) => Ok(printers),
            Err(e) => {
                // Degrade to the last known list when we have one.
                if let Some(entry) = self.cached_entry().await {
                    warn!(error = %e, "Enumeration failed, serving stale printer list");
                    return Ok(entry.printers);
                }
                Err(e)
            }
        }
    }

    async fn cached_entry(&self) -> Option<CachedPrinterList> {
        {
            let state = self.state.read().await;
            if let Some(entry) = &state.last {
                return Some(entry.clone());
            }
        }

        // Fall back to the durable cache (first call after restart)
        match self.cache.get_cached_printers() {
            Ok(Some(entry)) => {
                let mut state = self.state.write().await;
                state.last = Some(entry.clone());
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read cached printer list");
                None
            }
        }
    }

    async fn enumerate_and_store(&self) -> DiscoveryResult<Vec<String>> {
        let printers = self.enumerator.enumerate().await?;

        if let Err(e) = self.cache.set_cached_printers(&printers) {
            warn!(error = %e, "Failed to persist discovered printer list");
        }

        let mut state = self.state.write().await;
        state.last = Some(CachedPrinterList {
            printers: printers.clone(),
            cached_at: chrono::Utc::now().timestamp_millis(),
        });

        Ok(printers)
    }
}

fn entry_age(entry: &CachedPrinterList) -> Duration {
    let now = chrono::Utc::now().timestamp_millis();
    Duration::from_millis(now.saturating_sub(entry.cached_at).max(0) as u64)
}
