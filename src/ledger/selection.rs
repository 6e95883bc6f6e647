//! Period filtering and the views handed to the presentation layer.
//!
//! Every selected row keeps its absolute position in the ledger it was read from. Local
//! indices (what a table shows) are only ever translated through the view that produced
//! them, which is what makes deleting from a filtered table safe.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;

use super::{
    aggregate::summary_totals,
    codec::{decode, FIELD_COUNT},
};
use crate::{
    domain::{PeriodFilter, Transaction},
    errors::ValidationError,
    storage::RawRow,
};

/// A row chosen by [`select`], tagged with its 0-based position in the full ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRow {
    pub position: usize,
    pub row: RawRow,
}

/// Returns the rows matching `period`, in ledger order.
///
/// Rows with fewer than five fields are left out but keep their positions, so the
/// positions of later rows are never shifted.
pub fn select(rows: &[RawRow], period: &PeriodFilter) -> Vec<SelectedRow> {
    rows.iter()
        .enumerate()
        .filter(|(position, row)| {
            if row.len() < FIELD_COUNT {
                debug!("row {} excluded: {} fields", position, row.len());
                return false;
            }
            period.matches(row.timestamp_field())
        })
        .map(|(position, row)| SelectedRow {
            position,
            row: row.clone(),
        })
        .collect()
}

/// The result of filtering one ledger snapshot by period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerView {
    period: PeriodFilter,
    rows: Vec<SelectedRow>,
    snapshot_len: usize,
}

impl LedgerView {
    pub fn new(snapshot: &[RawRow], period: PeriodFilter) -> Self {
        let rows = select(snapshot, &period);
        Self {
            period,
            rows,
            snapshot_len: snapshot.len(),
        }
    }

    pub fn period(&self) -> &PeriodFilter {
        &self.period
    }

    pub fn rows(&self) -> &[SelectedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows in the ledger snapshot this view was taken from.
    pub fn snapshot_len(&self) -> usize {
        self.snapshot_len
    }

    /// Decoded rows with their positions. A row that does not decode yields `None` so
    /// local indices still line up with [`LedgerView::rows`].
    pub fn transactions(&self) -> Vec<(usize, Option<Transaction>)> {
        self.rows
            .iter()
            .map(|selected| {
                let decoded = decode(&selected.row)
                    .map_err(|reason| {
                        debug!("row {} not decoded: {}", selected.position, reason);
                    })
                    .ok();
                (selected.position, decoded)
            })
            .collect()
    }

    /// Signed sum of the amounts in this view.
    pub fn net_balance(&self) -> Decimal {
        summary_totals(self.rows.iter().map(|selected| &selected.row)).net_balance
    }

    /// The row this view captured at absolute `position`, if it selected one there.
    pub fn row_at(&self, position: usize) -> Option<&RawRow> {
        self.rows
            .binary_search_by_key(&position, |selected| selected.position)
            .ok()
            .map(|index| &self.rows[index].row)
    }

    /// Maps local indices to absolute positions. Duplicates collapse; any index outside
    /// the view fails the whole call.
    pub fn resolve(
        &self,
        local_indices: impl IntoIterator<Item = usize>,
    ) -> Result<BTreeSet<usize>, ValidationError> {
        local_indices
            .into_iter()
            .map(|index| {
                self.rows
                    .get(index)
                    .map(|selected| selected.position)
                    .ok_or(ValidationError::IndexOutOfRange {
                        index,
                        len: self.rows.len(),
                    })
            })
            .collect()
    }
}
