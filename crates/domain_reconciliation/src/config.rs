//! Reconciliation tuning
//!
//! Every field has a default, so an empty configuration source yields the
//! standard windows and tolerance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Account whose postings make up the plain-text cash balance
pub const DEFAULT_CHECKING_ACCOUNT: &str = "Assets:Checking:ChaseBusiness";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Plain-text account summed for the cash balance
    pub checking_account: String,
    /// Relative amount tolerance, 0.01 = 1%
    pub amount_tolerance: Decimal,
    pub cash_match_window_days: i64,
    pub payroll_match_window_days: i64,
    pub distribution_match_window_days: i64,
    /// Window for the advisory duplicate list in the report
    pub duplicate_report_window_days: i64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            checking_account: DEFAULT_CHECKING_ACCOUNT.to_string(),
            amount_tolerance: dec!(0.01),
            cash_match_window_days: 7,
            payroll_match_window_days: 14,
            distribution_match_window_days: 14,
            duplicate_report_window_days: 3,
        }
    }
}

impl ReconciliationConfig {
    pub fn with_checking_account(mut self, account: impl Into<String>) -> Self {
        self.checking_account = account.into();
        self
    }

    pub fn with_amount_tolerance(mut self, tolerance: Decimal) -> Self {
        self.amount_tolerance = tolerance;
        self
    }
}
