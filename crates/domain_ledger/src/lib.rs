//! Ledger Domain - plain-text ledger and structured journal sources
//!
//! This crate reads the human-maintained double-entry ledger and the
//! billing system's journal rows, and brings both onto one entry model:
//! - Parsing of the line-oriented ledger format
//! - Inference of omitted posting amounts and balance validation
//! - Ordered mapping of account names onto canonical account codes
//! - Conversion of both sources into `LedgerEntry` values

pub mod account_map;
pub mod balance;
pub mod codes;
pub mod entry;
pub mod error;
pub mod journal;
pub mod parser;
pub mod transaction;

pub use account_map::{sub_account, AccountCategory, AccountMapper, AccountRule, RulePattern};
pub use balance::BALANCE_TOLERANCE;
pub use entry::{split_amount, EntrySource, LedgerEntry, LedgerEntryUnifier};
pub use error::{BalanceError, JournalError, LedgerError, ParseError, ParseErrorKind};
pub use journal::{verify_journal_balance, Journal};
pub use transaction::{
    BeancountAccount, BeancountBalance, BeancountPosting, BeancountTransaction, Ledger,
    LedgerSummary, TransactionFlag, DEFAULT_CURRENCY,
};
