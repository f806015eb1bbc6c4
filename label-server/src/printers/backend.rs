//! Durable printer-settings backend
//!
//! The backend store is the authoritative tier for the selected
//! printer. It lives behind a trait so the identity store can be
//! exercised against an in-process fake; production talks HTTP.

use async_trait::async_trait;
use shared::PrinterIdentity;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend rejected request: {0}")]
    Rejected(String),

    #[error("Printer unreachable: {0}")]
    Unreachable(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Authoritative storage plus device validation.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Fetch the persisted printer identity, `None` when never saved.
    async fn get_printer_settings(&self) -> BackendResult<Option<PrinterIdentity>>;

    /// Persist an identity, overwriting any previous value.
    async fn save_printer_settings(&self, identity: &PrinterIdentity) -> BackendResult<()>;

    /// Ask the device layer to validate that the named printer answers.
    async fn connect_printer(&self, identity: &PrinterIdentity) -> BackendResult<()>;
}

/// HTTP implementation against the catalog backend.
#[derive(Debug, Clone)]
pub struct HttpSettingsBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSettingsBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl SettingsBackend for HttpSettingsBackend {
    #[instrument(skip(self))]
    async fn get_printer_settings(&self) -> BackendResult<Option<PrinterIdentity>> {
        let response = self
            .client
            .get(self.url("/api/printer-settings"))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BackendError::Rejected(response.status().to_string()));
        }

        let identity: Option<PrinterIdentity> = response.json().await?;
        Ok(identity)
    }

    #[instrument(skip(self, identity), fields(printer = %identity.name))]
    async fn save_printer_settings(&self, identity: &PrinterIdentity) -> BackendResult<()> {
        let response = self
            .client
            .put(self.url("/api/printer-settings"))
            .json(identity)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Rejected(response.status().to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, identity), fields(printer = %identity.name))]
    async fn connect_printer(&self, identity: &PrinterIdentity) -> BackendResult<()> {
        let response = self
            .client
            .post(self.url("/api/printers/connect"))
            .json(identity)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Unreachable(identity.name.clone()));
        }
        Ok(())
    }
}
