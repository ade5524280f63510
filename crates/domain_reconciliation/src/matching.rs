//! Amount and date proximity tests used by deduplication

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use core_kernel::days_apart;

/// `|a1 - a2| / |a2| <= tolerance`
///
/// When `a2` is zero only an exact zero matches.
pub fn amounts_match_within_tolerance(a1: Decimal, a2: Decimal, tolerance: Decimal) -> bool {
    if a2.is_zero() {
        return a1.is_zero();
    }
    (a1 - a2).abs() / a2.abs() <= tolerance
}

/// Whether two timestamps fall within `window_days` calendar days (inclusive)
pub fn within_days(a: DateTime<Utc>, b: DateTime<Utc>, window_days: i64) -> bool {
    days_apart(a, b) <= window_days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_one_percent_boundary() {
        assert!(amounts_match_within_tolerance(dec!(101), dec!(100), dec!(0.01)));
        assert!(!amounts_match_within_tolerance(dec!(101.01), dec!(100), dec!(0.01)));
        assert!(amounts_match_within_tolerance(dec!(99), dec!(100), dec!(0.01)));
    }

    #[test]
    fn test_zero_reference_requires_exact_zero() {
        assert!(amounts_match_within_tolerance(dec!(0), dec!(0), dec!(0.01)));
        assert!(!amounts_match_within_tolerance(dec!(0.001), dec!(0), dec!(0.01)));
    }

    #[test]
    fn test_window_is_inclusive_on_calendar_days() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 8, 0, 1, 0).unwrap();
        assert!(within_days(a, b, 7));
        assert!(within_days(b, a, 7));
        assert!(!within_days(a, b, 6));
    }

    proptest! {
        #[test]
        fn prop_amount_matches_itself(cents in -10_000_000i64..10_000_000) {
            let amount = Decimal::new(cents, 2);
            prop_assert!(amounts_match_within_tolerance(amount, amount, Decimal::ZERO));
        }

        #[test]
        fn prop_nonzero_never_matches_zero(cents in 1i64..10_000_000) {
            let amount = Decimal::new(cents, 2);
            prop_assert!(!amounts_match_within_tolerance(amount, Decimal::ZERO, dec!(0.01)));
            prop_assert!(!amounts_match_within_tolerance(-amount, Decimal::ZERO, dec!(0.01)));
        }
    }
}
