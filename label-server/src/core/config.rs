/// Server configuration - everything the label station needs at boot
///
/// # Environment variables
///
/// Every item can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/estrela/label | Working directory (cache, history, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | BACKEND_URL | http://localhost:3001 | Catalog backend base URL |
/// | PRINTER_HOSTS | (empty) | Comma-separated printer hosts to probe |
/// | PRINTER_PORT | 9100 | Raw print port on each host |
/// | USE_MOCK_PRINTER | false | Dispatch to an in-memory device instead of hardware |
/// | ENVIRONMENT | development | Runtime environment |
/// | REQUEST_TIMEOUT_MS | 30000 | Backend request timeout (milliseconds) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/label PRINTER_HOSTS=192.168.1.50 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for cache, history and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Catalog backend base URL (printer settings live there)
    pub backend_url: String,
    /// Printer hosts probed during discovery
    pub printer_hosts: Vec<String>,
    /// Raw print port
    pub printer_port: u16,
    /// Use the in-memory mock device (no hardware attached)
    pub use_mock_printer: bool,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Backend request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the environment, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/estrela/label".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            printer_hosts: std::env::var("PRINTER_HOSTS")
                .map(|hosts| {
                    hosts
                        .split(',')
                        .map(str::trim)
                        .filter(|h| !h.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            printer_port: std::env::var("PRINTER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9100),
            use_mock_printer: std::env::var("USE_MOCK_PRINTER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override a few fields, mostly for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Path of the redb printer cache file
    pub fn cache_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("printer_cache.redb")
    }

    /// Path of the redb print history file
    pub fn history_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("print_history.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
