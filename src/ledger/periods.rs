use std::collections::BTreeSet;

use tracing::debug;

use super::codec::parse_timestamp;
use crate::{domain::PeriodFilter, storage::RawRow};

/// Lists the selectable periods: `All` first, then every month present, newest first.
///
/// Only the timestamp field is inspected, so rows too short to be transactions still
/// contribute the month they were recorded in.
pub fn list_periods(rows: &[RawRow]) -> Vec<PeriodFilter> {
    let mut months = BTreeSet::new();
    for (position, row) in rows.iter().enumerate() {
        let field = row.timestamp_field();
        if field.is_empty() {
            continue;
        }
        match parse_timestamp(field) {
            Ok(timestamp) => {
                months.insert(timestamp.format("%Y-%m").to_string());
            }
            Err(reason) => debug!("row {} skipped for periods: {}", position, reason),
        }
    }

    std::iter::once(PeriodFilter::All)
        .chain(months.into_iter().rev().map(PeriodFilter::Month))
        .collect()
}
