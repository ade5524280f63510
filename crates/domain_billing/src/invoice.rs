//! Invoices and adjustments
//!
//! An invoice covers one billing period of one project. Receivable invoices
//! go to the client; payable invoices collect internal time owed to staff.
//! Its state only moves forward along
//! `Draft -> Pending -> Approved -> Sent -> Paid`, and any state may be voided.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AdjustmentId, Currency, InvoiceId, Money, MoneyError, Period, ProjectId};

use crate::entry::Entry;
use crate::error::BillingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceType {
    /// Owed by a client
    #[serde(rename = "AR")]
    AccountsReceivable,
    /// Owed internally
    #[serde(rename = "AP")]
    AccountsPayable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceState {
    Draft,
    Pending,
    Approved,
    Sent,
    Paid,
    Void,
}

impl InvoiceState {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: InvoiceState) -> bool {
        matches!(
            (self, next),
            (_, InvoiceState::Void)
                | (InvoiceState::Draft, InvoiceState::Pending)
                | (InvoiceState::Pending, InvoiceState::Approved)
                | (InvoiceState::Approved, InvoiceState::Sent)
                | (InvoiceState::Sent, InvoiceState::Paid)
        )
    }

    /// The only state `next` may be entered from, if there is one
    pub fn required_prior(next: InvoiceState) -> Option<InvoiceState> {
        match next {
            InvoiceState::Pending => Some(InvoiceState::Draft),
            InvoiceState::Approved => Some(InvoiceState::Pending),
            InvoiceState::Sent => Some(InvoiceState::Approved),
            InvoiceState::Paid => Some(InvoiceState::Sent),
            InvoiceState::Draft | InvoiceState::Void => None,
        }
    }

    /// Draft and pending invoices still accept entries
    pub fn is_open(&self) -> bool {
        matches!(self, InvoiceState::Draft | InvoiceState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Reduces the amount due
    Credit,
    /// Adds to the amount due
    Fee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentState {
    Draft,
    Approved,
    Void,
}

/// A credit or fee applied to an invoice as its own line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: AdjustmentId,
    pub invoice_id: InvoiceId,
    pub kind: AdjustmentType,
    pub state: AdjustmentState,
    /// Magnitude; the sign is taken from `kind`
    pub amount: Money,
    pub notes: String,
}

impl Adjustment {
    pub fn new(invoice_id: InvoiceId, kind: AdjustmentType, amount: Money) -> Self {
        Self {
            id: AdjustmentId::new_v7(),
            invoice_id,
            kind,
            state: AdjustmentState::Draft,
            amount,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn void(mut self) -> Self {
        self.state = AdjustmentState::Void;
        self
    }

    /// Credits count negative, fees positive, whatever sign `amount` carries
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            AdjustmentType::Credit => -self.amount.abs(),
            AdjustmentType::Fee => self.amount.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub project_id: ProjectId,
    pub name: String,
    /// Half-open billing period
    pub period: Period,
    pub invoice_type: InvoiceType,
    pub state: InvoiceState,
    pub total_hours: Decimal,
    pub total_fees: Money,
    pub total_adjustments: Money,
    pub total_amount: Money,
    pub accepted_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// A new draft for a project's billing period
    pub fn draft(project_id: ProjectId, project_name: &str, period: Period, invoice_type: InvoiceType) -> Self {
        let now = Utc::now();
        // Periods are half-open; the name shows the last day covered.
        let last_day = period.end - Duration::nanoseconds(1);
        Self {
            id: InvoiceId::new_v7(),
            project_id,
            name: format!(
                "{}: {}-{}",
                project_name,
                period.start.format("%m.%d.%Y"),
                last_day.format("%m.%d.%Y")
            ),
            period,
            invoice_type,
            state: InvoiceState::Draft,
            total_hours: Decimal::ZERO,
            total_fees: Money::zero(Currency::USD),
            total_adjustments: Money::zero(Currency::USD),
            total_amount: Money::zero(Currency::USD),
            accepted_at: None,
            sent_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_receivable(&self) -> bool {
        self.invoice_type == InvoiceType::AccountsReceivable
    }

    /// Moves to `next`, enforcing the forward-only order
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidPriorState` naming the current and required
    /// states; the invoice is left unmodified.
    pub fn transition_to(&mut self, next: InvoiceState) -> Result<(), BillingError> {
        if !self.state.can_transition_to(next) {
            return Err(BillingError::InvalidPriorState {
                invoice: self.id,
                current: self.state,
                required: InvoiceState::required_prior(next).unwrap_or(self.state),
                requested: next,
            });
        }

        let now = Utc::now();
        match next {
            InvoiceState::Approved => self.accepted_at = Some(now),
            InvoiceState::Sent => self.sent_at = Some(now),
            InvoiceState::Paid | InvoiceState::Void => self.closed_at = Some(now),
            InvoiceState::Draft | InvoiceState::Pending => {}
        }
        self.state = next;
        self.updated_at = now;
        Ok(())
    }

    /// Recomputes totals from the invoice's entries and adjustments
    ///
    /// Void entries and void adjustments are ignored. Hours are the exact
    /// entry durations; fees are the fees persisted on each entry.
    pub fn recalculate_totals(&mut self, entries: &[Entry], adjustments: &[Adjustment]) -> Result<(), MoneyError> {
        let live: Vec<&Entry> = entries.iter().filter(|e| !e.is_void()).collect();

        self.total_hours = live.iter().map(|e| e.hours()).sum();
        let fees: Vec<Money> = live.iter().map(|e| e.fee).collect();
        self.total_fees = Money::try_sum(&fees, Currency::USD)?;

        let signed: Vec<Money> = adjustments
            .iter()
            .filter(|a| a.state != AdjustmentState::Void)
            .map(Adjustment::signed_amount)
            .collect();
        self.total_adjustments = Money::try_sum(&signed, Currency::USD)?;

        self.total_amount = self.total_fees.checked_add(&self.total_adjustments)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}
