//! Reconciliation Domain - plain-text ledger against the journal
//!
//! Decides which plain-text entries the journal already accounts for,
//! builds the combined general ledger from both sources, and reports the
//! cash difference between them.

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod matching;
pub mod ports;
pub mod report;
pub mod rules;

pub use config::{ReconciliationConfig, DEFAULT_CHECKING_ACCOUNT};
pub use dedup::{DedupDecision, ExcludeReason, KeepReason};
pub use engine::{CombinedLedger, ReconciliationEngine};
pub use error::ReconciliationError;
pub use matching::{amounts_match_within_tolerance, within_days};
pub use ports::JournalPort;
pub use report::{Confidence, PotentialDuplicate, ReconciliationReport};
pub use rules::{CashDisposition, KeywordRule, KeywordRules, RuleCondition};
