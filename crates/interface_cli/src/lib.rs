//! Command-line layer
//!
//! Configuration loading, logging setup and the `ledger-check` diagnostic
//! that parses the plain-text ledger and reconciles it against a journal
//! export.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::{check, AppConfig};
//!
//! let config = AppConfig::load()?;
//! let outcome = check::run_check(&config)?;
//! check::render(&outcome, &mut std::io::stdout())?;
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod logging;

pub use crate::check::{run_check, CheckOutcome};
pub use crate::config::AppConfig;
pub use crate::error::CliError;
