//! Domain models for ledger transactions.

use std::{fmt, str::FromStr};

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::is_valid_category;
use crate::errors::ValidationError;

/// Canonical text form of a transaction timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of fractional digits kept on stored amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest magnitude accepted for a single transaction: 999,999,999,999.99.
/// Every amount up to this bound keeps exactly [`AMOUNT_SCALE`] fractional digits.
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, AMOUNT_SCALE)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Direction of money flow for a transaction.
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// Applies the sign convention of this type to a non-negative magnitude.
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            TransactionType::Income => magnitude,
            TransactionType::Expense => -magnitude,
        }
    }

    /// Returns `true` when `amount` carries the sign this type requires.
    pub fn admits(&self, amount: Decimal) -> bool {
        match self {
            TransactionType::Income => amount > Decimal::ZERO,
            TransactionType::Expense => amount < Decimal::ZERO,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transaction type `{0}`")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

/// A single ledger entry. Immutable once created; corrections are delete + re-add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    /// Signed, positive for income and negative for expense.
    pub amount: Decimal,
    pub category: String,
    pub kind: TransactionType,
    pub note: String,
}

impl Transaction {
    /// Absolute value of the amount.
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }

    /// The `YYYY-MM` key of the period this transaction falls in.
    pub fn period_key(&self) -> String {
        self.timestamp.format("%Y-%m").to_string()
    }
}

/// User input for a transaction that has not been validated yet.
///
/// The amount is kept as entered; [`NewTransaction::validate`] parses it as a positive
/// magnitude and applies the sign implied by `kind`.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub timestamp: NaiveDateTime,
    pub amount: String,
    pub category: String,
    pub kind: TransactionType,
    pub note: String,
}

impl NewTransaction {
    pub fn new(
        timestamp: NaiveDateTime,
        amount: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionType,
    ) -> Self {
        Self {
            timestamp,
            amount: amount.into(),
            category: category.into(),
            kind,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Checks the domain rules and builds the transaction that will be stored.
    pub fn validate(&self) -> Result<Transaction, ValidationError> {
        let magnitude = parse_magnitude(&self.amount)?;
        if !is_valid_category(self.kind, &self.category) {
            return Err(ValidationError::UnknownCategory {
                category: self.category.clone(),
                kind: self.kind,
            });
        }
        let timestamp = self
            .timestamp
            .with_nanosecond(0)
            .unwrap_or(self.timestamp);
        Ok(Transaction {
            timestamp,
            amount: self.kind.signed(magnitude),
            category: self.category.clone(),
            kind: self.kind,
            note: self.note.clone(),
        })
    }
}

/// Parses user-entered amount text into a positive magnitude rounded to cents.
fn parse_magnitude(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))?;
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    let max = max_amount();
    if rounded > max {
        return Err(ValidationError::AmountTooLarge { max });
    }
    rounded.rescale(AMOUNT_SCALE);
    if rounded.scale() != AMOUNT_SCALE {
        return Err(ValidationError::InvalidAmount(raw.to_string()));
    }
    Ok(rounded)
}
