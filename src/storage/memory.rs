use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{LedgerStore, RawRow, Result};

/// In-process ledger, used by tests and by embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    rows: Mutex<Vec<RawRow>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = RawRow>) -> Self {
        Self {
            rows: Mutex::new(rows.into_iter().collect()),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<RawRow>> {
        // A panic while holding the lock cannot leave the vector half-updated.
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load_all(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows().clone())
    }

    fn append(&self, row: &RawRow) -> Result<()> {
        self.rows().push(row.clone());
        Ok(())
    }

    fn rewrite_all(&self, rows: &[RawRow]) -> Result<()> {
        *self.rows() = rows.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_rewrite() {
        let store = MemoryLedgerStore::new();
        let a: RawRow = ["a"].into_iter().collect();
        let b: RawRow = ["b"].into_iter().collect();
        store.append(&a).unwrap();
        store.append(&b).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![a.clone(), b]);
        store.rewrite_all(std::slice::from_ref(&a)).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![a]);
    }
}
