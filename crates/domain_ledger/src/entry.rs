//! Canonical ledger entries and the unifier that produces them
//!
//! Plain-text postings and structured journal rows look nothing alike. The
//! `LedgerEntryUnifier` turns both into `LedgerEntry` values: one dated,
//! one-sided amount on a canonical account code, tagged with where it came
//! from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use core_kernel::{start_of_day, BillId, Currency, InvoiceId, Money, MoneyError};

use crate::account_map::{sub_account, AccountCategory, AccountMapper};
use crate::journal::Journal;
use crate::transaction::Ledger;

/// Which ledger an entry was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySource {
    #[serde(rename = "beancount")]
    Beancount,
    #[serde(rename = "journal_db")]
    JournalDb,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::Beancount => "beancount",
            EntrySource::JournalDb => "journal_db",
        }
    }
}

/// A source-agnostic ledger line
///
/// Debit and credit are non-negative major-unit amounts; for entries built
/// by the unifier at most one of them is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: DateTime<Utc>,
    /// Canonical account code
    pub account: String,
    pub sub_account: String,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub source: EntrySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_id: Option<BillId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl LedgerEntry {
    /// Converts one journal row, turning cents into major units
    pub fn from_journal(row: &Journal) -> Self {
        Self {
            date: row.created_at,
            account: row.account.clone(),
            sub_account: row.sub_account.clone(),
            description: row.memo.clone(),
            debit: Money::from_minor(row.debit, Currency::USD).amount(),
            credit: Money::from_minor(row.credit, Currency::USD).amount(),
            source: EntrySource::JournalDb,
            invoice_id: row.invoice_id,
            bill_id: row.bill_id,
            tags: Vec::new(),
        }
    }

    /// Debit minus credit
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }

    pub fn debit_minor(&self) -> Result<i64, MoneyError> {
        Money::new(self.debit, Currency::USD).to_minor()
    }

    pub fn credit_minor(&self) -> Result<i64, MoneyError> {
        Money::new(self.credit, Currency::USD).to_minor()
    }

    /// SHA-256 hex digest identifying the entry's content
    ///
    /// Hashes `date|account|sub_account|description|debit_cents|credit_cents`
    /// with the date as `YYYY-MM-DD`, so the same plain-text row imported
    /// twice produces the same digest.
    pub fn content_hash(&self) -> Result<String, MoneyError> {
        let data = format!(
            "{}|{}|{}|{}|{}|{}",
            self.date.format("%Y-%m-%d"),
            self.account,
            self.sub_account,
            self.description,
            self.debit_minor()?,
            self.credit_minor()?,
        );
        Ok(format!("{:x}", Sha256::digest(data.as_bytes())))
    }
}

/// Splits a signed posting amount into (debit, credit) for its account
///
/// Income reads positive as credit; every other category, including
/// liabilities and equity, reads positive as debit. Names outside the five
/// categories are treated like assets.
pub fn split_amount(account: &str, amount: Decimal) -> (Decimal, Decimal) {
    let positive_is_credit = match AccountCategory::of(account) {
        Some(category) => category.positive_is_credit(),
        None => {
            tracing::warn!(account, "Unrecognized account category, treating as debit-normal");
            false
        }
    };

    match (amount > Decimal::ZERO, positive_is_credit) {
        (true, false) => (amount, Decimal::ZERO),
        (false, false) => (Decimal::ZERO, -amount),
        (true, true) => (Decimal::ZERO, amount),
        (false, true) => (-amount, Decimal::ZERO),
    }
}

/// Converts both ledger sources into canonical entries
#[derive(Debug, Clone, Default)]
pub struct LedgerEntryUnifier {
    mapper: AccountMapper,
}

impl LedgerEntryUnifier {
    pub fn new(mapper: AccountMapper) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &AccountMapper {
        &self.mapper
    }

    /// One entry per non-zero posting, in file order
    ///
    /// Postings still at zero (omitted amounts that were never inferred)
    /// are skipped. Entries are dated at midnight UTC of the transaction
    /// date.
    pub fn from_ledger(&self, ledger: &Ledger) -> Vec<LedgerEntry> {
        ledger
            .transactions
            .iter()
            .flat_map(|tx| {
                tx.postings
                    .iter()
                    .filter(|p| !p.amount.is_zero())
                    .map(move |posting| {
                        let (debit, credit) = split_amount(&posting.account, posting.amount);
                        LedgerEntry {
                            date: start_of_day(tx.date),
                            account: self.mapper.map(&posting.account).to_string(),
                            sub_account: sub_account(&posting.account),
                            description: tx.description.clone(),
                            debit,
                            credit,
                            source: EntrySource::Beancount,
                            invoice_id: None,
                            bill_id: None,
                            tags: tx.tags.clone(),
                        }
                    })
            })
            .collect()
    }

    pub fn from_journals(&self, rows: &[Journal]) -> Vec<LedgerEntry> {
        rows.iter().map(LedgerEntry::from_journal).collect()
    }
}
