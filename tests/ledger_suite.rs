mod common;

use std::fs;

use common::{at, setup_test_env};
use rust_decimal::Decimal;
use saifu_core::{
    currency::balance_label,
    domain::{NewTransaction, PeriodFilter, TransactionType},
    init, LedgerError,
};

fn dec(raw: &str) -> Decimal {
    raw.parse().unwrap()
}

#[test]
fn salary_and_lunch_end_to_end() {
    init();
    let env = setup_test_env();
    let manager = &env.manager;

    manager
        .add_transaction(NewTransaction::new(
            at(2024, 1, 5),
            "100",
            "Salary",
            TransactionType::Income,
        ))
        .expect("add salary");
    manager
        .add_transaction(
            NewTransaction::new(at(2024, 1, 6), "40", "Food", TransactionType::Expense)
                .with_note("lunch"),
        )
        .expect("add lunch");

    let contents = fs::read_to_string(&env.ledger_file).expect("ledger written");
    assert_eq!(
        contents,
        "2024-01-05 12:30:00,100.00,Salary,Income,\n2024-01-06 12:30:00,-40.00,Food,Expense,lunch\n"
    );

    assert_eq!(
        manager.get_filter_periods().unwrap(),
        vec!["All Periods", "2024-01"]
    );

    let view = manager
        .get_transactions(&"2024-01".parse::<PeriodFilter>().unwrap())
        .unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(view.net_balance(), dec("60.00"));
    let options = env.config.load().unwrap().format_options();
    assert_eq!(
        balance_label(view.net_balance(), &options),
        "Net Balance: ₹60.00"
    );

    let breakdown = manager.get_breakdown(&PeriodFilter::All).unwrap();
    assert_eq!(breakdown.totals.total_income, dec("100.00"));
    assert_eq!(breakdown.totals.total_expense, dec("40.00"));
    assert_eq!(breakdown.categories.income.get("Salary"), Some(&dec("100.00")));
    assert_eq!(breakdown.categories.expense.get("Food"), Some(&dec("40.00")));
}

#[test]
fn notes_with_delimiters_round_trip_through_the_file() {
    let env = setup_test_env();
    let note = "dinner, \"the usual\"\nsplit with Ana";
    let stored = env
        .manager
        .add_transaction(
            NewTransaction::new(at(2024, 2, 14), "12.345", "Food", TransactionType::Expense)
                .with_note(note),
        )
        .unwrap();
    assert_eq!(stored.amount, dec("-12.35"));

    let view = env.manager.get_transactions(&PeriodFilter::All).unwrap();
    let decoded = view.transactions();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].1.as_ref(), Some(&stored));
}

#[test]
fn hand_edited_rows_are_tolerated() {
    let env = setup_test_env();
    fs::write(
        &env.ledger_file,
        "2024-03-01 08:00:00,-9.00,Food\n\
         \n\
         2024-01-05 10:00:00,100.00,Salary,Income,\n\
         someday,5.00,Gift,Income,\n\
         2024-01-07 10:00:00,abc,Food,Expense,\n",
    )
    .unwrap();

    assert_eq!(
        env.manager.get_filter_periods().unwrap(),
        vec!["All Periods", "2024-03", "2024-01"]
    );

    let view = env.manager.get_transactions(&PeriodFilter::All).unwrap();
    let positions: Vec<_> = view.rows().iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);

    let breakdown = env.manager.get_breakdown(&PeriodFilter::All).unwrap();
    assert_eq!(breakdown.totals.net_balance, dec("105.00"));
    assert_eq!(breakdown.totals.counted, 2);
    assert_eq!(breakdown.totals.skipped, 1);
    assert_eq!(breakdown.category_names, vec!["Gift", "Salary"]);
}

#[test]
fn deleting_from_a_month_keeps_other_rows_in_order() {
    let env = setup_test_env();
    for day in 1..=10u32 {
        let month = if day == 4 || day == 8 { 2 } else { 1 };
        env.manager
            .add_transaction(
                NewTransaction::new(at(2024, month, day), "1", "Bills", TransactionType::Expense)
                    .with_note(format!("row {}", day - 1)),
            )
            .unwrap();
    }
    let before = fs::read_to_string(&env.ledger_file).unwrap();
    let before: Vec<&str> = before.lines().collect();

    let view = env
        .manager
        .get_transactions(&PeriodFilter::month("2024-02"))
        .unwrap();
    let positions: Vec<_> = view.rows().iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![3, 7]);

    assert_eq!(env.manager.delete_from_view(&view, [0]).unwrap(), 1);

    let after = fs::read_to_string(&env.ledger_file).unwrap();
    let after: Vec<&str> = after.lines().collect();
    assert_eq!(after.len(), 9);
    assert!(!after.contains(&before[3]));
    assert_eq!(after[6], before[7]);
    assert_eq!(after[7], before[8]);

    // The view is now stale: the ledger shrank underneath it.
    let err = env.manager.delete_from_view(&view, [1]).unwrap_err();
    assert!(matches!(err, LedgerError::StaleView));
    assert_eq!(fs::read_to_string(&env.ledger_file).unwrap().lines().count(), 9);
}

#[test]
fn every_well_formed_row_matches_all_periods() {
    let env = setup_test_env();
    for (month, amount) in [(1, "5"), (3, "7"), (12, "9")] {
        env.manager
            .add_transaction(NewTransaction::new(
                at(2023, month, 2),
                amount,
                "Freelance",
                TransactionType::Income,
            ))
            .unwrap();
    }
    let all = env.manager.get_transactions(&PeriodFilter::All).unwrap();
    assert_eq!(all.len(), 3);

    let periods = env.manager.get_filter_periods().unwrap();
    assert_eq!(periods, vec!["All Periods", "2023-12", "2023-03", "2023-01"]);
    let per_month: usize = periods[1..]
        .iter()
        .map(|key| {
            env.manager
                .get_transactions(&PeriodFilter::from(key.as_str()))
                .unwrap()
                .len()
        })
        .sum();
    assert_eq!(per_month, all.len());
}
