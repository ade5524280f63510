//! Test Utilities Crate
//!
//! Shared fixtures, builders, assertions and proptest strategies for the
//! ledger and billing test suites.
//!
//! # Modules
//!
//! - `fixtures`: Canonical dates, amounts and a sample plain-text ledger
//! - `builders`: Builders for journal rows, projects, billing codes and entries
//! - `assertions`: Assertion helpers for journals, decisions and reports
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;
