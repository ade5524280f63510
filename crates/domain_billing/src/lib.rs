//! Billing Domain - from logged time to invoices and journal rows
//!
//! This crate turns time entries into invoices and owns their lifecycle:
//!
//! - Fee computation with round-down billing granularity
//! - Monthly or per-project billing periods and their rollover
//! - The forward-only invoice state machine, cascaded to entries
//! - Waterfall association of entries to open invoices
//! - Journal bookings when receivable invoices are approved or paid
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingStateMachine, AssociationOutcome};
//!
//! let machine = BillingStateMachine::new(store);
//! match machine.associate_entry(&mut entry, project.id).await? {
//!     AssociationOutcome::Associated { invoice_id } => println!("on {invoice_id}"),
//!     AssociationOutcome::Unaffiliated => println!("needs attention"),
//! }
//! ```

pub mod billing_code;
pub mod bookings;
pub mod entry;
pub mod error;
pub mod invoice;
pub mod ports;
pub mod project;
pub mod service;

pub use billing_code::{
    fee_for, internal_fee, BillingCode, BudgetCheck, BudgetDecision, BudgetPeriod, Rate,
    DEFAULT_ROUNDED_TO_MINUTES,
};
pub use entry::{Entry, EntryState};
pub use error::BillingError;
pub use invoice::{Adjustment, AdjustmentState, AdjustmentType, Invoice, InvoiceState, InvoiceType};
pub use ports::BillingPort;
pub use project::{BillingFrequency, Project};
pub use service::{AssociationOutcome, BackfillSummary, BillingStateMachine, Rollover};
