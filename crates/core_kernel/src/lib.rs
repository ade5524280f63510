//! Core Kernel - Foundational types shared by the ledger consistency engine
//!
//! This crate provides the fundamental building blocks used across all domain crates:
//! - Money types with precise decimal arithmetic and minor-unit conversion
//! - Half-open periods and inclusive date ranges
//! - Strongly-typed identifiers
//! - Port error types for the persistence seams

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{Period, DateRange, TemporalError, days_apart, start_of_day};
pub use identifiers::{
    ProjectId, InvoiceId, EntryId, BillingCodeId, RateId, EmployeeId,
    StaffingAssignmentId, AdjustmentId, JournalId, BillId, RecurringLineItemId,
};
pub use ports::{DomainPort, PortError};
