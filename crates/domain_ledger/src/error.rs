//! Ledger domain errors

use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// What went wrong on a single line of ledger text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The `YYYY-MM-DD` token is not a real calendar date
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// An amount token could not be read as a decimal number
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// A directive is missing required tokens
    #[error("invalid {directive} directive: expected at least {expected} tokens, found {found}")]
    MalformedDirective {
        directive: &'static str,
        expected: usize,
        found: usize,
    },
}

/// A parse failure, carrying the 1-based line number it occurred on
///
/// Parsing stops at the first error; no partial ledger is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// A transaction whose postings cannot be brought to zero
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// More than one posting omits its amount, so none can be inferred
    #[error("multiple postings with inferred amounts, line={line}")]
    MultipleInferredAmounts { line: usize },

    /// Postings sum to more than the allowed tolerance
    #[error("transaction does not balance: sum={sum:.2}, line={line}")]
    Unbalanced { sum: Decimal, line: usize },
}

impl BalanceError {
    /// Line number of the offending transaction header
    pub fn line(&self) -> usize {
        match self {
            BalanceError::MultipleInferredAmounts { line } => *line,
            BalanceError::Unbalanced { line, .. } => *line,
        }
    }
}

/// Errors raised while loading a ledger file
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ledger: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised by structured journal rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// Debits and credits of a journal set differ, in minor units
    #[error("journal does not balance: debits - credits = {net_minor}")]
    Unbalanced { net_minor: i64 },

    /// A row carries a negative or double-sided amount
    #[error("invalid journal row {id}: {reason}")]
    InvalidRow { id: String, reason: String },
}
