pub mod csv_backend;
pub mod memory;

use std::path::PathBuf;

use crate::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// The string fields of one stored line, exactly as read from or written to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawRow(Vec<String>);

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First field of the row, or `""` for a row without fields.
    pub fn timestamp_field(&self) -> &str {
        self.get(0).unwrap_or("")
    }

    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for RawRow {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Describes a snapshot of the ledger taken before a destructive rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Persistence primitive for the ledger.
///
/// Every read in the crate goes through [`LedgerStore::load_all`], so an indexed or
/// incremental backend can replace the flat file without touching callers.
pub trait LedgerStore: Send + Sync {
    /// Reads every row in stored order. A store that does not exist yet is empty.
    fn load_all(&self) -> Result<Vec<RawRow>>;

    /// Adds one row after the existing ones without reordering or truncating them.
    fn append(&self, row: &RawRow) -> Result<()>;

    /// Replaces the whole ledger. Either every new row is visible afterwards or the old
    /// contents are left in place.
    fn rewrite_all(&self, rows: &[RawRow]) -> Result<()>;
}

pub use csv_backend::CsvLedgerStore;
pub use memory::MemoryLedgerStore;
