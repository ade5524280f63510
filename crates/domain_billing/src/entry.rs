//! Time entries

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    BillingCodeId, Currency, EmployeeId, EntryId, InvoiceId, Money, ProjectId, StaffingAssignmentId,
};

use crate::invoice::InvoiceState;

/// Lifecycle state of an entry
///
/// Mirrors the state of the invoice it belongs to, plus `Unaffiliated` for
/// entries no invoice could take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Draft,
    Unaffiliated,
    Pending,
    Approved,
    Sent,
    Paid,
    Void,
}

impl From<InvoiceState> for EntryState {
    fn from(state: InvoiceState) -> Self {
        match state {
            InvoiceState::Draft => EntryState::Draft,
            InvoiceState::Pending => EntryState::Pending,
            InvoiceState::Approved => EntryState::Approved,
            InvoiceState::Sent => EntryState::Sent,
            InvoiceState::Paid => EntryState::Paid,
            InvoiceState::Void => EntryState::Void,
        }
    }
}

/// One span of billable or internal time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub project_id: ProjectId,
    pub employee_id: EmployeeId,
    pub billing_code_id: BillingCodeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub notes: String,
    /// Internal time is invoiced on the payable side
    pub internal: bool,
    pub invoice_id: Option<InvoiceId>,
    pub staffing_assignment_id: Option<StaffingAssignmentId>,
    pub state: EntryState,
    /// Duration the fee was computed from, in minutes
    pub duration_minutes: Decimal,
    /// Fee persisted at the last recomputation
    pub fee: Money,
}

impl Entry {
    pub fn new(
        project_id: ProjectId,
        employee_id: EmployeeId,
        billing_code_id: BillingCodeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self {
            id: EntryId::new_v7(),
            project_id,
            employee_id,
            billing_code_id,
            start,
            end,
            notes: String::new(),
            internal: false,
            invoice_id: None,
            staffing_assignment_id: None,
            state: EntryState::Draft,
            duration_minutes: Decimal::ZERO,
            fee: Money::zero(Currency::USD),
        };
        entry.duration_minutes = entry.minutes();
        entry
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn with_staffing_assignment(mut self, id: StaffingAssignmentId) -> Self {
        self.staffing_assignment_id = Some(id);
        self
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Exact duration in minutes, fractional seconds included
    pub fn minutes(&self) -> Decimal {
        Decimal::new(self.duration().num_seconds(), 0) / Decimal::from(60)
    }

    pub fn hours(&self) -> Decimal {
        self.minutes() / Decimal::from(60)
    }

    /// Stores a freshly computed fee along with the duration it used
    pub fn record_fee(&mut self, fee: Money) {
        self.duration_minutes = self.minutes();
        self.fee = fee;
    }

    pub fn is_void(&self) -> bool {
        self.state == EntryState::Void
    }

    pub(crate) fn link(&mut self, invoice_id: InvoiceId) {
        self.invoice_id = Some(invoice_id);
        self.state = EntryState::Draft;
    }

    pub(crate) fn mark_unaffiliated(&mut self) {
        self.invoice_id = None;
        self.state = EntryState::Unaffiliated;
    }
}
