//! Cash reconciliation report

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_ledger::LedgerEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Same calendar date and identical amount
    High,
    Medium,
}

/// A plain-text cash receipt that may also be in the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialDuplicate {
    pub beancount_entry: LedgerEntry,
    pub journal_entry: LedgerEntry,
    pub confidence: Confidence,
}

/// Cash position of both ledgers at a point in time
///
/// `potential_duplicates` is advisory only; nothing in it has been removed
/// from either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub cash_balance_beancount: Decimal,
    pub cash_balance_journal_db: Decimal,
    /// Plain-text balance minus journal balance
    pub difference: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub potential_duplicates: Vec<PotentialDuplicate>,
    pub as_of_date: DateTime<Utc>,
}

impl ReconciliationReport {
    pub fn new(
        cash_balance_beancount: Decimal,
        cash_balance_journal_db: Decimal,
        as_of_date: DateTime<Utc>,
    ) -> Self {
        Self {
            cash_balance_beancount,
            cash_balance_journal_db,
            difference: cash_balance_beancount - cash_balance_journal_db,
            potential_duplicates: Vec::new(),
            as_of_date,
        }
    }

    pub fn with_duplicates(mut self, duplicates: Vec<PotentialDuplicate>) -> Self {
        self.potential_duplicates = duplicates;
        self
    }

    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero()
    }

    pub fn high_confidence_duplicates(&self) -> impl Iterator<Item = &PotentialDuplicate> {
        self.potential_duplicates
            .iter()
            .filter(|d| d.confidence == Confidence::High)
    }
}
