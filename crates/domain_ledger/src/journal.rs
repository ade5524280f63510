//! Structured journal rows
//!
//! A `Journal` is one leg of a double-entry posting produced by the billing
//! system. Amounts are integer minor units (cents). Rows are never edited
//! after creation; mistakes are corrected by booking a reversal and, if
//! needed, a corrected row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, InvoiceId, JournalId, RecurringLineItemId};

use crate::error::JournalError;

/// A single journal leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    /// When the row was booked; used as the entry date
    pub created_at: DateTime<Utc>,
    /// Canonical account code, see [`crate::codes`]
    pub account: String,
    #[serde(default)]
    pub sub_account: String,
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
    #[serde(default)]
    pub bill_id: Option<BillId>,
    #[serde(default)]
    pub recurring_line_item_id: Option<RecurringLineItemId>,
    #[serde(default)]
    pub memo: String,
    /// Debit in minor units
    pub debit: i64,
    /// Credit in minor units
    pub credit: i64,
}

impl Journal {
    fn leg(account: impl Into<String>, debit: i64, credit: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: JournalId::new_v7(),
            created_at,
            account: account.into(),
            sub_account: String::new(),
            invoice_id: None,
            bill_id: None,
            recurring_line_item_id: None,
            memo: String::new(),
            debit,
            credit,
        }
    }

    /// Creates a debit leg
    ///
    /// # Arguments
    ///
    /// * `account` - Canonical account code
    /// * `minor` - Amount in cents
    /// * `created_at` - Booking timestamp
    pub fn debit(account: impl Into<String>, minor: i64, created_at: DateTime<Utc>) -> Self {
        Self::leg(account, minor, 0, created_at)
    }

    /// Creates a credit leg
    pub fn credit(account: impl Into<String>, minor: i64, created_at: DateTime<Utc>) -> Self {
        Self::leg(account, 0, minor, created_at)
    }

    pub fn with_sub_account(mut self, sub_account: impl Into<String>) -> Self {
        self.sub_account = sub_account.into();
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn for_invoice(mut self, invoice_id: InvoiceId) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    pub fn for_bill(mut self, bill_id: BillId) -> Self {
        self.bill_id = Some(bill_id);
        self
    }

    pub fn for_recurring_line_item(mut self, id: RecurringLineItemId) -> Self {
        self.recurring_line_item_id = Some(id);
        self
    }

    /// Signed effect on the account: debit minus credit, in minor units
    pub fn net_minor(&self) -> i64 {
        self.debit - self.credit
    }

    /// Checks the row is a well-formed single leg
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidRow` for negative amounts or a row
    /// carrying both a debit and a credit.
    pub fn check(&self) -> Result<(), JournalError> {
        let reason = if self.debit < 0 || self.credit < 0 {
            Some("amounts must not be negative")
        } else if self.debit > 0 && self.credit > 0 {
            Some("a row carries either a debit or a credit, not both")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(JournalError::InvalidRow {
                id: self.id.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Builds the offsetting row for this one
    ///
    /// Debit and credit are swapped and the memo records the reason and the
    /// original memo. The reversal is booked now.
    pub fn reversal(&self, reason: &str) -> Journal {
        Journal {
            id: JournalId::new_v7(),
            created_at: Utc::now(),
            account: self.account.clone(),
            sub_account: self.sub_account.clone(),
            invoice_id: None,
            bill_id: None,
            recurring_line_item_id: None,
            memo: format!("REVERSAL: {} (Original: {})", reason, self.memo),
            debit: self.credit,
            credit: self.debit,
        }
    }

    /// Marks this row as the correction of a reversed one
    pub fn correcting(mut self, original: &Journal) -> Self {
        self.memo = format!("CORRECTION: {} (Original entry: {})", self.memo, original.id);
        self
    }
}

/// Checks a set of journal rows nets to zero
///
/// # Errors
///
/// Returns `JournalError::Unbalanced` carrying total debits minus total
/// credits when they differ.
pub fn verify_journal_balance(rows: &[Journal]) -> Result<(), JournalError> {
    let net_minor: i64 = rows.iter().map(Journal::net_minor).sum();
    if net_minor != 0 {
        tracing::warn!(net_minor, rows = rows.len(), "Journal set does not balance");
        return Err(JournalError::Unbalanced { net_minor });
    }
    Ok(())
}
