use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::printers::PrinterCacheError> for ServerError {
    fn from(e: crate::printers::PrinterCacheError) -> Self {
        ServerError::Storage(e.to_string())
    }
}

impl From<crate::scheduler::HistoryError> for ServerError {
    fn from(e: crate::scheduler::HistoryError) -> Self {
        ServerError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
