//! Fixed category sets, conditioned on the transaction type.

use super::TransactionType;

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Investment",
    "Freelance",
    "Gift",
    "Refund",
    "Other Income",
];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    "Education",
    "Other Expense",
];

/// Returns the categories a transaction of `kind` may be filed under.
pub fn categories_for(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// Returns `true` when `category` belongs to the set of `kind`. Matching is exact.
pub fn is_valid_category(kind: TransactionType, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_sets_are_disjoint() {
        for name in INCOME_CATEGORIES {
            assert!(!EXPENSE_CATEGORIES.contains(name), "{name} in both sets");
        }
    }

    #[test]
    fn membership_is_conditioned_on_type() {
        assert!(is_valid_category(TransactionType::Income, "Salary"));
        assert!(!is_valid_category(TransactionType::Expense, "Salary"));
        assert!(is_valid_category(TransactionType::Expense, "Other Expense"));
        assert!(!is_valid_category(TransactionType::Expense, "food"));
    }
}
