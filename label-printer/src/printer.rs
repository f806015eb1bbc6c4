//! Printer adapters for sending raw label data
//!
//! Supports:
//! - Network printers (TCP port 9100)
//! - Mock printer for development without hardware

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, lookup_host};
use tracing::{info, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw label data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
///
/// Label printers with an ethernet or wifi interface accept raw
/// command streams on port 9100. The host may be an IP literal or a
/// name; resolution happens on every connect, so a printer that moves
/// behind its name keeps working.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Duration::from_secs(5),
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve the host and connect, trying each resolved address in
    /// order. The whole attempt is bounded by `limit`.
    async fn connect(&self, limit: Duration) -> PrintResult<TcpStream> {
        tokio::time::timeout(limit, async {
            let addrs: Vec<SocketAddr> = lookup_host((self.host.as_str(), self.port))
                .await
                .map_err(|e| {
                    PrintError::Connection(format!("{}:{}: {}", self.host, self.port, e))
                })?
                .collect();

            if addrs.is_empty() {
                return Err(PrintError::InvalidConfig(format!(
                    "Host does not resolve: {}",
                    self.host
                )));
            }

            let mut last_err = None;
            for addr in addrs {
                match TcpStream::connect(addr).await {
                    Ok(stream) => return Ok(stream),
                    Err(e) => last_err = Some(format!("{}: {}", addr, e)),
                }
            }
            Err(PrintError::Connection(
                last_err.unwrap_or_else(|| format!("{}:{}", self.host, self.port)),
            ))
        })
        .await
        .map_err(|_| {
            PrintError::Timeout(format!("Connection timeout: {}:{}", self.host, self.port))
        })?
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(host = %self.host, port = self.port, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = self.connect(self.timeout).await?;

        info!("Connected, sending {} bytes", data.len());

        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(host = %self.host, port = self.port))]
    async fn is_online(&self) -> bool {
        match self.connect(Duration::from_millis(500)).await {
            Ok(_) => {
                info!("Printer online");
                true
            }
            Err(e) => {
                warn!(error = %e, "Printer offline");
                false
            }
        }
    }
}

/// Mock printer that records everything it is asked to print.
///
/// Stands in for real hardware when no device is attached, so the
/// full pipeline can run on a development machine.
#[derive(Debug, Default)]
pub struct MockPrinter {
    jobs: Mutex<Vec<Vec<u8>>>,
}

impl MockPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs received so far, in order.
    pub fn jobs(&self) -> Vec<Vec<u8>> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().map(|j| j.len()).unwrap_or(0)
    }
}

impl Printer for MockPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!(data_len = data.len(), "[MOCK] print job received");
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(data.to_vec());
        }
        Ok(())
    }

    async fn is_online(&self) -> bool {
        true
    }
}
