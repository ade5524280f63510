//! Billing domain errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use core_kernel::{EntryId, InvoiceId, MoneyError, PortError, ProjectId, TemporalError};

use crate::invoice::InvoiceState;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// The invoice is not in the state the transition starts from
    #[error("Invoice {invoice} is {current:?}; moving to {requested:?} requires {required:?}")]
    InvalidPriorState {
        invoice: InvoiceId,
        current: InvoiceState,
        required: InvoiceState,
        requested: InvoiceState,
    },

    /// A new period would start before an existing draft ends
    #[error("New invoice period starting {new_start} overlaps draft invoice {existing} ending {existing_end}")]
    InvoiceOverlap {
        project: ProjectId,
        existing: InvoiceId,
        existing_end: DateTime<Utc>,
        new_start: DateTime<Utc>,
    },

    /// Entry start lies outside the project's active window
    #[error("Entry {entry} starting {start} is outside the active window of project {project}")]
    EntryOutOfRange {
        entry: EntryId,
        project: ProjectId,
        start: DateTime<Utc>,
    },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Persistence error: {0}")]
    Port(PortError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}

impl From<PortError> for BillingError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => BillingError::NotFound { entity_type, id },
            other => BillingError::Port(other),
        }
    }
}
