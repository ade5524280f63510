//! Outcome of deduplicating one plain-text entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::CashDisposition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum KeepReason {
    /// A CASH movement the journal never records
    Classified { disposition: CashDisposition },
    /// Nothing in the journal looked like it
    NoJournalMatch,
    /// The account is not subject to deduplication
    UntrackedAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum ExcludeReason {
    /// A CASH movement the journal books on its own
    Classified { disposition: CashDisposition },
    /// Revenue comes from invoices only
    InvoiceRevenue,
    /// A journal row matched on amount and date
    JournalMatch { journal_date: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "detail")]
pub enum DedupDecision {
    Keep(KeepReason),
    Exclude(ExcludeReason),
}

impl DedupDecision {
    pub fn is_keep(&self) -> bool {
        matches!(self, DedupDecision::Keep(_))
    }

    pub fn is_exclude(&self) -> bool {
        !self.is_keep()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DedupDecision::Keep(KeepReason::Classified { .. }) => "kept: ledger-only cash movement",
            DedupDecision::Keep(KeepReason::NoJournalMatch) => "kept: no journal match",
            DedupDecision::Keep(KeepReason::UntrackedAccount) => "kept: account not deduplicated",
            DedupDecision::Exclude(ExcludeReason::Classified { .. }) => "excluded: booked by journal",
            DedupDecision::Exclude(ExcludeReason::InvoiceRevenue) => "excluded: revenue from invoices",
            DedupDecision::Exclude(ExcludeReason::JournalMatch { .. }) => "excluded: journal match",
        }
    }
}

impl From<CashDisposition> for DedupDecision {
    fn from(disposition: CashDisposition) -> Self {
        if disposition.keeps() {
            DedupDecision::Keep(KeepReason::Classified { disposition })
        } else {
            DedupDecision::Exclude(ExcludeReason::Classified { disposition })
        }
    }
}
