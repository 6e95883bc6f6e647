#![doc(test(attr(deny(warnings))))]

//! SAIFU core keeps a personal finance ledger in a flat CSV file and answers the
//! questions a tracker UI asks of it: which periods exist, which transactions fall in a
//! period, what they add up to, and which of them to delete.
//!
//! [`LedgerManager`] is the entry point; everything below it is usable on its own.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::LedgerManager;
pub use crate::domain::{NewTransaction, PeriodFilter, Transaction, TransactionType};
pub use crate::errors::{LedgerError, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SAIFU core tracing initialized.");
    });
}
