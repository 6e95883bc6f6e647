pub mod category;
pub mod period;
pub mod transaction;

pub use category::{EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use period::{PeriodFilter, ALL_PERIODS};
pub use transaction::{NewTransaction, Transaction, TransactionType, TIMESTAMP_FORMAT};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal;
