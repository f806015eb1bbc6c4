//! redb-based print run history

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Print runs table: key = run_id, value = JSON
const PRINT_RUNS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("print_runs");

/// Index: (started_at_millis, run_id) -> () for time-ordered listing
const PRINT_RUNS_BY_TIME_TABLE: TableDefinition<(i64, &str), ()> =
    TableDefinition::new("print_runs_by_time");

#[derive(Debug, Error)]
pub enum HistoryError {
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

pub type HistoryResult<T> = Result<T, HistoryError>;

/// One completed (or failed) print run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrintRunRecord {
    pub id: String,
    pub printer_name: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub total_labels: usize,
    pub printed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at_batch_index: Option<usize>,
    /// Product codes in print order, one per label.
    pub product_codes: Vec<String>,
}

/// Print run history storage
#[derive(Clone)]
pub struct PrintHistory {
    db: Arc<Database>,
}

impl PrintHistory {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> HistoryResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRINT_RUNS_TABLE)?;
            let _ = write_txn.open_table(PRINT_RUNS_BY_TIME_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> HistoryResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRINT_RUNS_TABLE)?;
            let _ = write_txn.open_table(PRINT_RUNS_BY_TIME_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Store a print run record
    pub fn record(&self, run: &PrintRunRecord) -> HistoryResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PRINT_RUNS_TABLE)?;
            let value = serde_json::to_vec(run)?;
            table.insert(run.id.as_str(), value.as_slice())?;

            let mut idx_table = write_txn.open_table(PRINT_RUNS_BY_TIME_TABLE)?;
            idx_table.insert((run.started_at, run.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a run by ID
    pub fn get(&self, id: &str) -> HistoryResult<Option<PrintRunRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRINT_RUNS_TABLE)?;

        match table.get(id)? {
            Some(guard) => {
                let run: PrintRunRecord = serde_json::from_slice(guard.value())?;
                Ok(Some(run))
            }
            None => Ok(None),
        }
    }

    /// List the most recent runs, newest first
    pub fn list_recent(&self, limit: usize) -> HistoryResult<Vec<PrintRunRecord>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(PRINT_RUNS_BY_TIME_TABLE)?;
        let table = read_txn.open_table(PRINT_RUNS_TABLE)?;

        let mut runs = Vec::new();
        for entry in idx_table.iter()?.rev() {
            if runs.len() >= limit {
                break;
            }
            let (key, _) = entry?;
            let (_, run_id) = key.value();
            if let Some(guard) = table.get(run_id)? {
                runs.push(serde_json::from_slice(guard.value())?);
            }
        }

        Ok(runs)
    }
}
