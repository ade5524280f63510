//! Reconciliation domain errors
//!
//! Individual entries never fail a reconciliation; a bad entry is logged
//! and skipped. Only the inputs themselves can fail.

use core_kernel::{PortError, TemporalError};
use thiserror::Error;

/// Errors that can occur while reconciling
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// Journal rows could not be loaded
    #[error("failed to load journal entries: {0}")]
    Port(#[from] PortError),

    /// The requested window is empty or inverted
    #[error("invalid reconciliation window: {0}")]
    InvalidWindow(#[from] TemporalError),
}
