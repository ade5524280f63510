//! Integration tests for the Money module
//!
//! Tests cover creation, minor-unit conversion, arithmetic and the
//! rounding behaviour fee computation relies on.

use core_kernel::{Currency, Money, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_default_currency_is_usd() {
        assert_eq!(Currency::default(), Currency::USD);
    }
}

mod minor_units {
    use super::*;

    #[test]
    fn test_to_minor_of_journal_amount() {
        let m = Money::new(dec!(12345.67), Currency::USD);
        assert_eq!(m.to_minor().unwrap(), 1_234_567);
    }

    #[test]
    fn test_to_minor_of_negative_amount() {
        let m = Money::new(dec!(-0.01), Currency::USD);
        assert_eq!(m.to_minor().unwrap(), -1);
    }

    #[test]
    fn test_to_minor_overflow() {
        let m = Money::new(dec!(79228162514264337593543950.0), Currency::USD);
        assert!(matches!(m.to_minor(), Err(MoneyError::MinorUnitOverflow(_))));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_sub_can_go_negative() {
        let a = Money::new(dec!(30.00), Currency::USD);
        let b = Money::new(dec!(100.00), Currency::USD);
        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(-70.00));
    }

    #[test]
    fn test_multiply_hours_by_rate() {
        let rate = Money::new(dec!(100.00), Currency::USD);
        assert_eq!(rate.multiply(dec!(0.25)).amount(), dec!(25.00));
    }

    #[test]
    fn test_divide_by_zero_error() {
        let m = Money::new(dec!(100.00), Currency::USD);
        assert!(matches!(m.divide(dec!(0)), Err(MoneyError::DivisionByZero)));
    }

    #[test]
    fn test_round_to_currency() {
        let m = Money::new(dec!(33.3333), Currency::USD);
        assert_eq!(m.round_to_currency().amount(), dec!(33.33));
    }

    #[test]
    fn test_abs_and_negation() {
        let m = Money::new(dec!(-42.50), Currency::USD);
        assert_eq!(m.abs().amount(), dec!(42.50));
        assert_eq!((-m).amount(), dec!(42.50));
    }

    #[test]
    fn test_try_sum_rejects_mixed_currencies() {
        let items = vec![
            Money::new(dec!(1), Currency::USD),
            Money::new(dec!(1), Currency::EUR),
        ];
        assert!(matches!(
            Money::try_sum(&items, Currency::USD),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_currency_serializes_uppercase() {
        let json = serde_json::to_string(&Currency::USD).unwrap();
        assert_eq!(json, "\"USD\"");
    }
}
