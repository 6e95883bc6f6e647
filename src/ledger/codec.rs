//! Conversion between [`Transaction`] values and stored rows.
//!
//! A stored row is `[timestamp, amount, category, type, note]`. Rows that cannot be read
//! back are reported as [`MalformedRecord`]; callers skip them and carry on so that one
//! bad line never hides the rest of the ledger.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    domain::{transaction::AMOUNT_SCALE, Transaction, TransactionType, TIMESTAMP_FORMAT},
    storage::RawRow,
};

/// Number of fields in a complete row.
pub const FIELD_COUNT: usize = 5;

const TIMESTAMP_FIELD: usize = 0;
const AMOUNT_FIELD: usize = 1;
const CATEGORY_FIELD: usize = 2;
const TYPE_FIELD: usize = 3;
const NOTE_FIELD: usize = 4;

/// Why a stored row was skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("row has {0} fields, expected 5")]
    TooFewFields(usize),
    #[error("unparsable amount `{0}`")]
    Amount(String),
    #[error("unknown transaction type `{0}`")]
    Type(String),
    #[error("unparsable timestamp `{0}`")]
    Timestamp(String),
    #[error("amount {amount} does not match type {kind}")]
    SignMismatch {
        amount: Decimal,
        kind: TransactionType,
    },
    #[error("amount {0} overflows the running total")]
    Overflow(Decimal),
}

/// The fields of a row that aggregation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting<'a> {
    pub amount: Decimal,
    pub category: &'a str,
    pub kind: TransactionType,
}

pub fn encode(transaction: &Transaction) -> RawRow {
    let mut amount = transaction.amount;
    amount.rescale(AMOUNT_SCALE);
    RawRow::new(vec![
        transaction.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        amount.to_string(),
        transaction.category.clone(),
        transaction.kind.to_string(),
        transaction.note.clone(),
    ])
}

/// Reads a full transaction back from a stored row. Fields past the fifth are ignored.
pub fn decode(row: &RawRow) -> Result<Transaction, MalformedRecord> {
    let posting = posting(row)?;
    let timestamp = parse_timestamp(row.timestamp_field())?;
    Ok(Transaction {
        timestamp,
        amount: posting.amount,
        category: posting.category.to_string(),
        kind: posting.kind,
        note: row.get(NOTE_FIELD).unwrap_or_default().to_string(),
    })
}

/// Reads amount, category and type, without requiring a valid timestamp.
pub fn posting(row: &RawRow) -> Result<Posting<'_>, MalformedRecord> {
    if row.len() < FIELD_COUNT {
        return Err(MalformedRecord::TooFewFields(row.len()));
    }
    let amount = parse_amount(row.get(AMOUNT_FIELD).unwrap_or_default())?;
    let kind = parse_type(row.get(TYPE_FIELD).unwrap_or_default())?;
    if !kind.admits(amount) {
        return Err(MalformedRecord::SignMismatch { amount, kind });
    }
    Ok(Posting {
        amount,
        category: row.get(CATEGORY_FIELD).unwrap_or_default(),
        kind,
    })
}

/// Parses a stored amount. Surrounding whitespace and exponent notation are tolerated.
pub fn parse_amount(raw: &str) -> Result<Decimal, MalformedRecord> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| MalformedRecord::Amount(raw.to_string()))
}

pub fn parse_type(raw: &str) -> Result<TransactionType, MalformedRecord> {
    raw.parse()
        .map_err(|_| MalformedRecord::Type(raw.to_string()))
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, MalformedRecord> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| MalformedRecord::Timestamp(raw.to_string()))
}
