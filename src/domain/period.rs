use std::{convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDateTime;

/// Label of the selector entry that matches every period.
pub const ALL_PERIODS: &str = "All Periods";

/// Period selector used to filter the ledger.
///
/// `Month` holds a `YYYY-MM` key. Matching is a raw prefix comparison against the stored
/// timestamp text, so any prefix of the canonical format (a bare year, say) also works.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PeriodFilter {
    #[default]
    All,
    Month(String),
}

impl PeriodFilter {
    pub fn month(key: impl Into<String>) -> Self {
        PeriodFilter::Month(key.into())
    }

    /// The `YYYY-MM` period containing `timestamp`.
    pub fn month_of(timestamp: &NaiveDateTime) -> Self {
        PeriodFilter::Month(timestamp.format("%Y-%m").to_string())
    }

    /// Tests the raw timestamp field of a stored row against this selector.
    pub fn matches(&self, timestamp_field: &str) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Month(key) => timestamp_field.starts_with(key.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PeriodFilter::All)
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::All => f.write_str(ALL_PERIODS),
            PeriodFilter::Month(key) => f.write_str(key),
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PeriodFilter::from(s))
    }
}

impl From<&str> for PeriodFilter {
    fn from(value: &str) -> Self {
        if value == ALL_PERIODS {
            PeriodFilter::All
        } else {
            PeriodFilter::Month(value.to_string())
        }
    }
}
