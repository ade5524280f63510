//! Journal rows booked by invoice events
//!
//! Approval accrues the receivable against revenue; payment moves it into
//! cash. Payable invoices book nothing here.

use chrono::{DateTime, Utc};

use domain_ledger::codes;
use domain_ledger::Journal;

use crate::error::BillingError;
use crate::invoice::Invoice;

fn pair(
    invoice: &Invoice,
    project_name: &str,
    debit_account: &str,
    credit_account: &str,
    memo: String,
    at: DateTime<Utc>,
) -> Result<Vec<Journal>, BillingError> {
    if !invoice.is_receivable() || invoice.total_amount.is_zero() {
        return Ok(Vec::new());
    }
    let minor = invoice.total_amount.to_minor()?;
    // A net-credit invoice books the same pair in the opposite direction.
    let (debit_account, credit_account, minor) = if minor < 0 {
        (credit_account, debit_account, -minor)
    } else {
        (debit_account, credit_account, minor)
    };
    Ok(vec![
        Journal::debit(debit_account, minor, at)
            .with_sub_account(project_name)
            .with_memo(memo.clone())
            .for_invoice(invoice.id),
        Journal::credit(credit_account, minor, at)
            .with_sub_account(project_name)
            .with_memo(memo)
            .for_invoice(invoice.id),
    ])
}

/// Accrued receivable and revenue for an approved receivable invoice
pub fn approval_rows(invoice: &Invoice, project_name: &str, at: DateTime<Utc>) -> Result<Vec<Journal>, BillingError> {
    pair(
        invoice,
        project_name,
        codes::ACCRUED_RECEIVABLES,
        codes::REVENUE,
        format!("Invoice approved: {}", invoice.name),
        at,
    )
}

/// Cash receipt clearing the accrued receivable
pub fn payment_rows(invoice: &Invoice, project_name: &str, at: DateTime<Utc>) -> Result<Vec<Journal>, BillingError> {
    pair(
        invoice,
        project_name,
        codes::CASH,
        codes::ACCRUED_RECEIVABLES,
        format!("Invoice paid: {}", invoice.name),
        at,
    )
}
