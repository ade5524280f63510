//! Pre-built Test Fixtures
//!
//! Consistent, predictable data shared by the test suites.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{Currency, Money, Period};
use domain_ledger::Ledger;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// Standard external hourly rate
    pub fn hourly_rate() -> Money {
        Money::new(dec!(150.00), Currency::USD)
    }

    /// Rate used for internal time
    pub fn internal_rate() -> Money {
        Money::new(dec!(60.00), Currency::USD)
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }
}

/// Fixture for dates and windows
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        // Callers pass literal, valid calendar values.
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid fixture timestamp")
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
    }

    /// 2024-01-10, mid-month so the first receivable draft is backdated
    pub fn project_start() -> DateTime<Utc> {
        Self::utc(2024, 1, 10, 0)
    }

    pub fn project_end() -> DateTime<Utc> {
        Self::utc(2025, 1, 1, 0)
    }

    pub fn project_window() -> Period {
        Period::new(Self::project_start(), Self::project_end()).expect("fixture window is ordered")
    }

    /// 09:00 UTC on a day in March 2024
    pub fn march_workday(day: u32) -> DateTime<Utc> {
        Self::utc(2024, 3, day, 9)
    }
}

/// Fixture for plain-text ledgers
pub struct LedgerFixtures;

impl LedgerFixtures {
    /// A small set of books touching every deduplication path
    pub const SAMPLE_BOOKS: &'static str = r#"
option "operating_currency" "USD"
2024-01-01 open Assets:Checking:ChaseBusiness USD
2024-01-01 open Income:ClientBillables:Vanta USD

2024-02-02 * "ORIG CO NAME:VANTA INC ENTRY DESCR:INVOICE 1042"
  Assets:Checking:ChaseBusiness   4,500.00 USD
  Income:ClientBillables:Vanta

2024-02-05 * "Payment to Chase Card ending 1234"
  Assets:Checking:ChaseBusiness    -820.00 USD
  Liabilities:CreditCard:ChaseCredit

2024-02-09 * "Stripe" "Monthly fees"
  Assets:Checking:ChaseBusiness     -42.10 USD
  Expenses:Fees:Stripe

2024-02-15 * "Gusto" "Payroll"
  Expenses:Payroll:Salaries        3,000.00 USD
  Assets:Checking:ChaseBusiness
"#;

    pub fn sample_ledger() -> Ledger {
        Ledger::parse(Self::SAMPLE_BOOKS).expect("sample books parse")
    }
}
