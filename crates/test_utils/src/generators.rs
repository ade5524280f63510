//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data

use chrono::{Duration, NaiveDate};
use core_kernel::{Currency, Money};
use domain_ledger::Journal;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::TemporalFixtures;

/// Positive amounts in cents, up to ten million dollars
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000
}

/// Signed amounts in cents
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000
}

pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    amount_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::USD))
}

/// Non-zero posting amounts with two decimal places
pub fn posting_amount_strategy() -> impl Strategy<Value = Decimal> {
    amount_minor_strategy()
        .prop_filter("posting amounts are non-zero", |m| *m != 0)
        .prop_map(|minor| Decimal::new(minor, 2))
}

/// Relative tolerances between 0 and 10%
pub fn tolerance_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=1000).prop_map(|bp| Decimal::new(bp, 4))
}

/// Calendar dates in 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..366).prop_map(|offset| TemporalFixtures::date(2024, 1, 1) + Duration::days(offset))
}

/// A balanced debit/credit pair on two accounts
pub fn journal_pair_strategy(
    debit_account: &'static str,
    credit_account: &'static str,
) -> impl Strategy<Value = Vec<Journal>> {
    (positive_amount_minor_strategy(), date_2024_strategy()).prop_map(move |(minor, date)| {
        let at = core_kernel::start_of_day(date);
        vec![
            Journal::debit(debit_account, minor, at),
            Journal::credit(credit_account, minor, at),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::{codes, verify_journal_balance};

    proptest! {
        #[test]
        fn journal_pairs_always_balance(rows in journal_pair_strategy(codes::CASH, codes::REVENUE)) {
            prop_assert!(verify_journal_balance(&rows).is_ok());
        }

        #[test]
        fn money_minor_round_trip(money in usd_money_strategy()) {
            prop_assert_eq!(Money::from_minor(money.to_minor().unwrap(), Currency::USD), money);
        }
    }
}
