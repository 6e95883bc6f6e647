//! Display formatting for ledger amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::transaction::AMOUNT_SCALE;

const BALANCE_LABEL: &str = "Net Balance";

/// Symbol and separators used when rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub symbol: String,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            symbol: "₹".into(),
            grouping_separator: ',',
            decimal_separator: '.',
        }
    }
}

/// Formats `value` with two decimals and grouped thousands, e.g. `-1,234.50`.
pub fn format_number(value: Decimal, options: &FormatOptions) -> String {
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    let body = rounded.abs().to_string();
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    let grouped = group_digits(int_part, options.grouping_separator);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}{}", sign, grouped, options.decimal_separator, frac_part)
}

/// Formats an amount with the currency symbol after the sign, e.g. `-₹1,234.50`.
pub fn format_amount(value: Decimal, options: &FormatOptions) -> String {
    let body = format_number(value, options);
    match body.strip_prefix('-') {
        Some(magnitude) => format!("-{}{}", options.symbol, magnitude),
        None => format!("{}{}", options.symbol, body),
    }
}

/// The balance line shown under the transaction table.
pub fn balance_label(value: Decimal, options: &FormatOptions) -> String {
    format!("{}: {}", BALANCE_LABEL, format_amount(value, options))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn groups_thousands_and_pads_decimals() {
        let options = FormatOptions::default();
        assert_eq!(format_number(dec("1234.5"), &options), "1,234.50");
        assert_eq!(format_number(dec("1234567.891"), &options), "1,234,567.89");
        assert_eq!(format_number(dec("12"), &options), "12.00");
        assert_eq!(format_number(dec("-999.999"), &options), "-1,000.00");
    }

    #[test]
    fn symbol_follows_the_sign() {
        let options = FormatOptions::default();
        assert_eq!(format_amount(dec("-1234.50"), &options), "-₹1,234.50");
        assert_eq!(format_amount(dec("60"), &options), "₹60.00");
        assert_eq!(format_amount(dec("-0.001"), &options), "₹0.00");
    }

    #[test]
    fn balance_label_matches_display() {
        let options = FormatOptions::default();
        assert_eq!(
            balance_label(dec("60.00"), &options),
            "Net Balance: ₹60.00"
        );
    }

    #[test]
    fn custom_separators() {
        let options = FormatOptions {
            symbol: "€".into(),
            grouping_separator: '.',
            decimal_separator: ',',
        };
        assert_eq!(format_amount(dec("-1234567.5"), &options), "-€1.234.567,50");
    }
}
