//! Totals and per-category breakdowns over stored rows.
//!
//! A row counts when its amount, type and sign agree (see [`codec::posting`]) and adding
//! it keeps every sum within `Decimal` range; anything else is skipped and counted.
//! Because only sign-consistent rows contribute, the net balance always equals income
//! minus expense.
//!
//! The desktop tracker this ledger format comes from summed every parsable amount into
//! its balance, whatever the type column said. On hand-edited files whose signs
//! disagree with their types, the totals here can therefore differ from that app's.
//!
//! [`codec::posting`]: super::codec::posting

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codec::{posting, MalformedRecord, Posting};
use crate::{domain::TransactionType, storage::RawRow};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub net_balance: Decimal,
    pub total_income: Decimal,
    /// Sum of expense magnitudes, never negative.
    pub total_expense: Decimal,
    pub counted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub income: BTreeMap<String, Decimal>,
    pub expense: BTreeMap<String, Decimal>,
}

/// Everything a breakdown screen shows for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub totals: SummaryTotals,
    pub categories: CategoryBreakdown,
    /// Sorted union of income and expense category names.
    pub category_names: Vec<String>,
}

impl Breakdown {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> Self {
        let Accumulator { totals, categories } = Accumulator::over(rows);
        let category_names = category_union(&categories.income, &categories.expense);
        Self {
            totals,
            categories,
            category_names,
        }
    }
}

/// Running sums shared by totals and category maps, so both skip the same rows.
#[derive(Debug, Default)]
struct Accumulator {
    totals: SummaryTotals,
    categories: CategoryBreakdown,
}

impl Accumulator {
    fn over<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> Self {
        let mut acc = Self::default();
        for row in rows {
            match posting(row).and_then(|entry| acc.apply(&entry)) {
                Ok(()) => acc.totals.counted += 1,
                Err(reason) => {
                    debug!("row skipped from totals: {}", reason);
                    acc.totals.skipped += 1;
                }
            }
        }
        acc
    }

    /// Adds one posting. If any sum would overflow, nothing is changed.
    fn apply(&mut self, entry: &Posting<'_>) -> Result<(), MalformedRecord> {
        let overflow = || MalformedRecord::Overflow(entry.amount);
        let magnitude = entry.amount.abs();
        let net = self
            .totals
            .net_balance
            .checked_add(entry.amount)
            .ok_or_else(overflow)?;
        let (total, bucket) = match entry.kind {
            TransactionType::Income => {
                (&mut self.totals.total_income, &mut self.categories.income)
            }
            TransactionType::Expense => {
                (&mut self.totals.total_expense, &mut self.categories.expense)
            }
        };
        let new_total = total.checked_add(magnitude).ok_or_else(overflow)?;
        let new_category = bucket
            .get(entry.category)
            .copied()
            .unwrap_or(Decimal::ZERO)
            .checked_add(magnitude)
            .ok_or_else(overflow)?;

        *total = new_total;
        bucket.insert(entry.category.to_string(), new_category);
        self.totals.net_balance = net;
        Ok(())
    }
}

pub fn summary_totals<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> SummaryTotals {
    Accumulator::over(rows).totals
}

pub fn category_breakdown<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> CategoryBreakdown {
    Accumulator::over(rows).categories
}

pub fn category_union(
    income: &BTreeMap<String, Decimal>,
    expense: &BTreeMap<String, Decimal>,
) -> Vec<String> {
    income
        .keys()
        .chain(expense.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
