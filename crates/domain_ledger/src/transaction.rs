//! Plain-text ledger model
//!
//! These types mirror what a hand-maintained double-entry ledger file
//! contains: dated transactions with indented postings, account-open
//! directives and balance assertions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::LedgerError;
use crate::parser;

/// Currency assumed when a posting omits one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Cleared/pending marker on a transaction header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionFlag {
    /// `*`
    Cleared,
    /// `!`
    Pending,
}

impl TransactionFlag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(TransactionFlag::Cleared),
            '!' => Some(TransactionFlag::Pending),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            TransactionFlag::Cleared => '*',
            TransactionFlag::Pending => '!',
        }
    }
}

/// A single posting line within a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeancountPosting {
    /// Colon-delimited account name, e.g. `Assets:Checking:ChaseBusiness`
    pub account: String,
    /// Signed amount in major units; zero means "to be inferred"
    pub amount: Decimal,
    /// Commodity code
    pub currency: String,
}

impl BeancountPosting {
    pub fn new(account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// A posting whose amount is left for the balancer to fill in
    pub fn inferred(account: impl Into<String>) -> Self {
        Self::new(account, Decimal::ZERO)
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// A dated transaction with its postings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeancountTransaction {
    pub date: NaiveDate,
    pub flag: TransactionFlag,
    /// First of two quoted strings on the header line
    pub payee: Option<String>,
    /// The narration: the only quoted string, or the second of two
    pub description: String,
    /// `#tag` tokens in order of appearance, duplicates retained
    pub tags: Vec<String>,
    pub postings: Vec<BeancountPosting>,
    /// 1-based line number of the header
    pub line: usize,
}

impl BeancountTransaction {
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            date,
            flag: TransactionFlag::Cleared,
            payee: None,
            description: description.into(),
            tags: Vec::new(),
            postings: Vec::new(),
            line: 0,
        }
    }

    pub fn with_posting(mut self, posting: BeancountPosting) -> Self {
        self.postings.push(posting);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// `DATE open ACCOUNT [CURRENCIES...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeancountAccount {
    pub date: NaiveDate,
    pub name: String,
    pub line: usize,
}

/// `DATE balance ACCOUNT AMOUNT CURRENCY`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeancountBalance {
    pub date: NaiveDate,
    pub account: String,
    pub amount: Decimal,
    pub currency: String,
    pub line: usize,
}

/// Counts reported by diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub transactions: usize,
    pub accounts: usize,
    pub balance_assertions: usize,
}

/// Everything parsed out of one ledger file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub transactions: Vec<BeancountTransaction>,
    pub accounts: Vec<BeancountAccount>,
    pub balances: Vec<BeancountBalance>,
    /// Where the ledger was read from, if it came from disk
    pub source_path: Option<PathBuf>,
}

impl Ledger {
    /// Parses ledger text held in memory
    ///
    /// # Errors
    ///
    /// Returns the first line-numbered `ParseError` encountered.
    pub fn parse(input: &str) -> Result<Self, crate::error::ParseError> {
        parser::parse(input)
    }

    /// Parses raw ledger bytes; invalid UTF-8 sequences are replaced
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::error::ParseError> {
        parser::parse(&String::from_utf8_lossy(bytes))
    }

    /// Reads and parses a ledger file, recording its path
    ///
    /// # Errors
    ///
    /// * `LedgerError::Io` - the file could not be read
    /// * `LedgerError::Parse` - the contents are malformed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut ledger = Self::from_bytes(&bytes)?;
        ledger.source_path = Some(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            transactions = ledger.transactions.len(),
            "Loaded ledger file"
        );
        Ok(ledger)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            transactions: self.transactions.len(),
            accounts: self.accounts.len(),
            balance_assertions: self.balances.len(),
        }
    }
}
