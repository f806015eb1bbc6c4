//! redb-based local cache tier for printer identity and discovery

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::PrinterIdentity;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Single key-value table: "selected_printer" and "cached_printers"
const PRINTER_CACHE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("printer_cache");

const SELECTED_PRINTER_KEY: &str = "selected_printer";
const CACHED_PRINTERS_KEY: &str = "cached_printers";

#[derive(Debug, Error)]
pub enum PrinterCacheError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PrinterCacheResult<T> = Result<T, PrinterCacheError>;

/// Discovered printer list as stored in the cache, with the wall-clock
/// moment it was fetched (millis since epoch).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct CachedPrinterList {
    pub printers: Vec<String>,
    pub cached_at: i64,
}

/// Fast-path cache for the selected printer and discovery results
#[derive(Clone)]
pub struct PrinterCacheStore {
    db: Arc<Database>,
}

impl PrinterCacheStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> PrinterCacheResult<Self> {
        let db = Database::create(path)?;

        // Initialize table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRINTER_CACHE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> PrinterCacheResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRINTER_CACHE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put(&self, key: &str, value: &[u8]) -> PrinterCacheResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PRINTER_CACHE_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get(&self, key: &str) -> PrinterCacheResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRINTER_CACHE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    // ========== Selected printer ==========

    pub fn set_selected(&self, identity: &PrinterIdentity) -> PrinterCacheResult<()> {
        let value = serde_json::to_vec(identity)?;
        self.put(SELECTED_PRINTER_KEY, &value)
    }

    pub fn get_selected(&self) -> PrinterCacheResult<Option<PrinterIdentity>> {
        match self.get(SELECTED_PRINTER_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    // ========== Discovered printers ==========

    pub fn set_cached_printers(&self, printers: &[String]) -> PrinterCacheResult<()> {
        let entry = CachedPrinterList {
            printers: printers.to_vec(),
            cached_at: chrono::Utc::now().timestamp_millis(),
        };
        let value = serde_json::to_vec(&entry)?;
        self.put(CACHED_PRINTERS_KEY, &value)
    }

    pub fn get_cached_printers(&self) -> PrinterCacheResult<Option<CachedPrinterList>> {
        match self.get(CACHED_PRINTERS_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
