//! Table storage for the pennybook ledger
//!
//! The ledger is a single four-column CSV table that is always read and
//! rewritten as a whole. [`TableStorage`] hides where that table lives so the
//! ledger logic does not care whether it is a file or a buffer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub mod error;
pub mod table;

pub use error::{StoreError, StoreResult};
pub use table::{decode_table, encode_table, RawRecord, Table};

/// Storage reference type
pub type StorageRef = Arc<dyn TableStorage>;

/// Whole-table persistence for the ledger
pub trait TableStorage: Send + Sync {
    /// Read and decode the full table
    fn read(&self) -> StoreResult<Table>;

    /// Replace the stored table with `table`
    fn write(&self, table: &Table) -> StoreResult<()>;

    /// Human-readable location, used in logs and error messages
    fn location(&self) -> String;
}

// ==================== File Storage ====================

/// A CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvFileStorage {
    path: PathBuf,
    expected_columns: usize,
}

impl CsvFileStorage {
    pub fn new(path: impl Into<PathBuf>, expected_columns: usize) -> Self {
        Self {
            path: path.into(),
            expected_columns,
        }
    }
}

impl TableStorage for CsvFileStorage {
    fn read(&self) -> StoreResult<Table> {
        let bytes = fs::read(&self.path)?;
        let table = decode_table(&bytes, &self.location(), self.expected_columns)?;
        log::debug!("Read {} rows from {}", table.len(), self.location());
        Ok(table)
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        let bytes = encode_table(table)?;
        write_replacing(&self.path, &bytes)?;
        log::debug!("Wrote {} rows to {}", table.len(), self.location());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write `bytes` next to `path` and rename over it, so readers never see a
/// half-written ledger.
fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, bytes)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

// ==================== Memory Storage ====================

/// The same CSV codec over an in-memory buffer
#[derive(Debug)]
pub struct MemoryStorage {
    content: Mutex<Option<Vec<u8>>>,
    expected_columns: usize,
}

impl MemoryStorage {
    /// A storage with nothing written yet
    pub fn new(expected_columns: usize) -> Self {
        Self {
            content: Mutex::new(None),
            expected_columns,
        }
    }

    /// A storage preloaded with raw bytes
    pub fn with_content(content: impl Into<Vec<u8>>, expected_columns: usize) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
            expected_columns,
        }
    }

    /// The raw bytes currently stored
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl TableStorage for MemoryStorage {
    fn read(&self) -> StoreResult<Table> {
        let guard = self.content.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_deref() {
            Some(bytes) => decode_table(bytes, &self.location(), self.expected_columns),
            None => Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "memory table has not been written",
            ))),
        }
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        let bytes = encode_table(table)?;
        *self.content.lock().unwrap_or_else(|e| e.into_inner()) = Some(bytes);
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn header() -> Vec<String> {
        vec!["date".into(), "amount".into(), "category".into(), "description".into()]
    }

    #[test]
    fn test_file_storage_missing_file() {
        let dir = tempdir().unwrap();
        let storage = CsvFileStorage::new(dir.path().join("finance_data.csv"), 4);

        let err = storage.read().unwrap_err();
        assert!(err.is_missing());
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = tempdir().unwrap();
        let storage = CsvFileStorage::new(dir.path().join("finance_data.csv"), 4);

        let mut table = Table::empty(&header());
        table.rows.push(RawRecord::new("15-03-2024", "12.50", "Expense", "lunch"));
        storage.write(&table).unwrap();

        let read = storage.read().unwrap();
        assert_eq!(read.header, header());
        assert_eq!(read.rows[0].amount, "12.50");
        assert!(!dir.path().join("finance_data.csv.tmp").exists());
    }

    #[test]
    fn test_file_storage_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("books.csv");
        let storage = CsvFileStorage::new(&path, 4);

        storage.write(&Table::empty(&header())).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date,amount,category,description\n"
        );
    }

    #[test]
    fn test_memory_storage_starts_missing() {
        let storage = MemoryStorage::new(4);
        assert!(storage.read().unwrap_err().is_missing());
        assert!(storage.contents().is_none());
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new(4);
        storage.write(&Table::empty(&header())).unwrap();

        assert_eq!(
            storage.contents().unwrap(),
            b"date,amount,category,description\n".to_vec()
        );
        assert!(storage.read().unwrap().is_empty());
    }

    #[test]
    fn test_memory_storage_corrupt_content() {
        let storage = MemoryStorage::with_content("a,b\n1,2\n", 4);
        assert!(storage.read().unwrap_err().is_corrupt());
    }
}
