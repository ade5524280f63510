//! CLI error handling

use std::path::PathBuf;
use thiserror::Error;

use core_kernel::TemporalError;
use domain_ledger::LedgerError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Cannot read journal export {path}: {source}")]
    JournalExport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed journal export {path}: {source}")]
    JournalFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error("Cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Cannot write output: {0}")]
    Output(#[from] std::io::Error),
}
