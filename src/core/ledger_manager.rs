use std::path::Path;

use tracing::{info, warn};

use crate::{
    config::Config,
    domain::{NewTransaction, PeriodFilter, Transaction},
    errors::{LedgerError, Result},
    ledger::{codec, list_periods, Breakdown, LedgerView},
    storage::{CsvLedgerStore, LedgerStore, RawRow},
};

/// Facade the presentation layer talks to.
///
/// Nothing is cached between calls: every operation reloads the ledger through the store.
pub struct LedgerManager {
    store: Box<dyn LedgerStore>,
}

impl LedgerManager {
    pub fn new(store: Box<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Builds a manager over the CSV ledger named by `config`, relative to `base_dir`.
    pub fn from_config(config: &Config, base_dir: &Path) -> Self {
        let path = config.resolve_ledger_file(base_dir);
        let store = CsvLedgerStore::with_backups(
            path,
            config.resolve_backups_dir(base_dir),
            config.backup_retention,
        );
        Self::new(Box::new(store))
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    /// Period selector entries, `"All Periods"` first.
    pub fn get_filter_periods(&self) -> Result<Vec<String>> {
        let rows = self.store.load_all()?;
        Ok(list_periods(&rows)
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// Validates and appends a transaction, returning what was stored.
    pub fn add_transaction(&self, input: NewTransaction) -> Result<Transaction> {
        let transaction = input.validate()?;
        self.store.append(&codec::encode(&transaction))?;
        Ok(transaction)
    }

    pub fn get_transactions(&self, period: &PeriodFilter) -> Result<LedgerView> {
        let rows = self.store.load_all()?;
        Ok(LedgerView::new(&rows, period.clone()))
    }

    pub fn get_breakdown(&self, period: &PeriodFilter) -> Result<Breakdown> {
        let view = self.get_transactions(period)?;
        Ok(Breakdown::from_rows(
            view.rows().iter().map(|selected| &selected.row),
        ))
    }

    /// Deletes the rows at `local_indices` of a view returned earlier by
    /// [`LedgerManager::get_transactions`].
    ///
    /// Fails with [`LedgerError::StaleView`] without writing if the ledger no longer
    /// matches the snapshot the view was taken from.
    pub fn delete_from_view(
        &self,
        view: &LedgerView,
        local_indices: impl IntoIterator<Item = usize>,
    ) -> Result<usize> {
        let targets = view.resolve(local_indices)?;
        if targets.is_empty() {
            return Ok(0);
        }

        let rows = self.store.load_all()?;
        if rows.len() != view.snapshot_len() {
            warn!(
                "refusing delete: ledger has {} rows, view was taken from {}",
                rows.len(),
                view.snapshot_len()
            );
            return Err(LedgerError::StaleView);
        }
        for &position in &targets {
            if rows.get(position) != view.row_at(position) {
                warn!("refusing delete: row {} changed since the view was taken", position);
                return Err(LedgerError::StaleView);
            }
        }

        let kept: Vec<RawRow> = rows
            .into_iter()
            .enumerate()
            .filter(|(position, _)| !targets.contains(position))
            .map(|(_, row)| row)
            .collect();
        self.store.rewrite_all(&kept)?;
        info!("deleted {} rows from period `{}`", targets.len(), view.period());
        Ok(targets.len())
    }

    /// Selects `period` on a fresh snapshot and deletes `local_indices` from it.
    pub fn delete_by_local_indices(
        &self,
        period: &PeriodFilter,
        local_indices: impl IntoIterator<Item = usize>,
    ) -> Result<usize> {
        let view = self.get_transactions(period)?;
        self.delete_from_view(&view, local_indices)
    }
}
