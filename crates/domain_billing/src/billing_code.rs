//! Billing codes, rates, fee computation and budget checks
//!
//! A billing code ties a project to the rate its time is charged at and to
//! the granularity that time is rounded down to before charging.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillingCodeId, Money, Period, ProjectId, RateId, TemporalError};

use crate::entry::Entry;

/// Rounding granularity used when a code does not set one
pub const DEFAULT_ROUNDED_TO_MINUTES: u32 = 15;

/// An hourly rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub id: RateId,
    pub name: String,
    /// Charge per hour
    pub amount: Money,
    /// Only used for payroll, never shown to clients
    pub internal_only: bool,
}

impl Rate {
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: RateId::new_v7(),
            name: name.into(),
            amount,
            internal_only: false,
        }
    }

    pub fn internal_only(mut self) -> Self {
        self.internal_only = true;
        self
    }
}

/// Window a billing code's budget applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    /// The code's whole active window
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCode {
    pub id: BillingCodeId,
    pub project_id: ProjectId,
    pub code: String,
    pub name: String,
    /// Rate billed to the client
    pub rate_id: RateId,
    /// Rate paid to staff, if different
    pub internal_rate_id: Option<RateId>,
    /// Billable time is rounded down to a multiple of this many minutes
    pub rounded_to_minutes: u32,
    pub budget_period: BudgetPeriod,
    pub budget_hours: Option<Decimal>,
    pub active: Period,
}

impl BillingCode {
    pub fn new(project_id: ProjectId, code: impl Into<String>, rate_id: RateId, active: Period) -> Self {
        let code = code.into();
        Self {
            id: BillingCodeId::new_v7(),
            project_id,
            name: code.clone(),
            code,
            rate_id,
            internal_rate_id: None,
            rounded_to_minutes: DEFAULT_ROUNDED_TO_MINUTES,
            budget_period: BudgetPeriod::Monthly,
            budget_hours: None,
            active,
        }
    }

    pub fn with_internal_rate(mut self, rate_id: RateId) -> Self {
        self.internal_rate_id = Some(rate_id);
        self
    }

    pub fn rounded_to(mut self, minutes: u32) -> Self {
        self.rounded_to_minutes = minutes;
        self
    }

    pub fn with_budget(mut self, hours: Decimal, period: BudgetPeriod) -> Self {
        self.budget_hours = Some(hours);
        self.budget_period = period;
        self
    }

    /// Billable hours for a duration after rounding down
    ///
    /// A granularity of zero disables rounding.
    pub fn billable_hours(&self, minutes: Decimal) -> Decimal {
        let sixty = Decimal::from(60);
        if self.rounded_to_minutes == 0 {
            return minutes / sixty;
        }
        let unit = Decimal::from(self.rounded_to_minutes);
        (minutes / unit).floor() * unit / sixty
    }

    /// Window whose billed hours count against the budget for time at `at`
    pub fn budget_window(&self, at: DateTime<Utc>) -> Result<Period, TemporalError> {
        match self.budget_period {
            BudgetPeriod::Monthly => Period::month_containing(at),
            BudgetPeriod::Project => Ok(self.active),
        }
    }
}

/// Fee for an entry at the given rate
///
/// The duration is rounded down to the code's granularity first, so time
/// short of one full unit bills as zero. The result is rounded to cents.
pub fn fee_for(entry: &Entry, code: &BillingCode, rate: &Rate) -> Money {
    rate.amount
        .multiply(code.billable_hours(entry.minutes()))
        .round_to_currency()
}

/// Fee paid to staff for an entry, at the code's internal rate
///
/// Returns `None` when the code has no internal rate or `internal_rate` is
/// not the one the code names.
pub fn internal_fee(entry: &Entry, code: &BillingCode, internal_rate: &Rate) -> Option<Money> {
    if code.internal_rate_id != Some(internal_rate.id) {
        return None;
    }
    Some(fee_for(entry, code, internal_rate))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum BudgetDecision {
    WithinBudget,
    OverBudget {
        budget_hours: Decimal,
        billed_hours: Decimal,
        overage_hours: Decimal,
    },
}

impl BudgetDecision {
    /// Whether the notification layer should alert
    pub fn warrants_alert(&self) -> bool {
        matches!(self, BudgetDecision::OverBudget { .. })
    }
}

/// Decides whether a billing code has exceeded its budget
pub struct BudgetCheck;

impl BudgetCheck {
    pub fn evaluate(code: &BillingCode, billed_hours_in_period: Decimal) -> BudgetDecision {
        match code.budget_hours {
            Some(budget) if billed_hours_in_period > budget => BudgetDecision::OverBudget {
                budget_hours: budget,
                billed_hours: billed_hours_in_period,
                overage_hours: billed_hours_in_period - budget,
            },
            _ => BudgetDecision::WithinBudget,
        }
    }
}
