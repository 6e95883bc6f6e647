use std::{io, path::PathBuf};

use thiserror::Error;

use crate::domain::TransactionType;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error type surfaced to callers of the ledger facade.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("ledger changed since the view was taken; reload before deleting")]
    StaleView,
}

/// Caller-supplied input that fails domain rules. Nothing is written when raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount must not exceed {max}")]
    AmountTooLarge { max: rust_decimal::Decimal },
    #[error("category `{category}` is not a valid {kind} category")]
    UnknownCategory {
        category: String,
        kind: TransactionType,
    },
    #[error("row {index} is out of range for a view of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Underlying file I/O failed. The store is assumed to be in its pre-operation state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to {op} `{}`: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to {op} CSV rows in `{}`: {source}", path.display())]
    Csv {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("backup `{0}` not found")]
    BackupNotFound(String),
}

impl StorageError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(op: &'static str, path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StorageError::Csv {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Failures of the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
