//! Deduplication, combined ledger and cash report
//!
//! The journal is authoritative. Plain-text entries are only added to the
//! combined ledger when nothing in the journal already accounts for them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use core_kernel::{start_of_day, DateRange, Period};
use domain_ledger::codes;
use domain_ledger::{BalanceError, Journal, Ledger, LedgerEntry, LedgerEntryUnifier};

use crate::config::ReconciliationConfig;
use crate::dedup::{DedupDecision, ExcludeReason, KeepReason};
use crate::error::ReconciliationError;
use crate::matching::{amounts_match_within_tolerance, within_days};
use crate::ports::JournalPort;
use crate::report::{Confidence, PotentialDuplicate, ReconciliationReport};
use crate::rules::KeywordRules;

/// Both ledgers merged into one date-ordered list
#[derive(Debug, Clone, Default)]
pub struct CombinedLedger {
    pub entries: Vec<LedgerEntry>,
    /// Balance problems found in the plain-text ledger; entries were still built
    pub validation_errors: Vec<BalanceError>,
    pub journal_count: usize,
    pub beancount_kept: usize,
    pub beancount_excluded: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
    unifier: LedgerEntryUnifier,
    rules: KeywordRules,
}

impl ReconciliationEngine {
    pub fn new(config: ReconciliationConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_unifier(mut self, unifier: LedgerEntryUnifier) -> Self {
        self.unifier = unifier;
        self
    }

    pub fn with_rules(mut self, rules: KeywordRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Decides whether one plain-text entry is already in the journal
    pub fn decide(&self, entry: &LedgerEntry, journal: &[LedgerEntry]) -> DedupDecision {
        let decision = match entry.account.as_str() {
            codes::CASH => self.decide_cash(entry, journal),
            codes::REVENUE | codes::ADJUSTMENT_REVENUE => {
                DedupDecision::Exclude(ExcludeReason::InvoiceRevenue)
            }
            codes::PAYROLL_EXPENSE => self.decide_payroll(entry, journal),
            codes::OWNER_DISTRIBUTIONS => self.decide_distribution(entry, journal),
            _ => DedupDecision::Keep(KeepReason::UntrackedAccount),
        };

        debug!(
            date = %entry.date.date_naive(),
            account = %entry.account,
            description = %entry.description,
            debit = %entry.debit,
            credit = %entry.credit,
            decision = decision.label(),
            "Deduplication decision"
        );
        decision
    }

    fn decide_cash(&self, entry: &LedgerEntry, journal: &[LedgerEntry]) -> DedupDecision {
        if let Some(disposition) = self.rules.classify(&entry.description, entry.debit) {
            return disposition.into();
        }

        let amount = entry.net();
        let matched = journal.iter().find(|jn| {
            jn.account == codes::CASH
                && amounts_match_within_tolerance(amount, jn.net(), self.config.amount_tolerance)
                && within_days(entry.date, jn.date, self.config.cash_match_window_days)
        });
        Self::exclude_on_match(matched)
    }

    fn decide_payroll(&self, entry: &LedgerEntry, journal: &[LedgerEntry]) -> DedupDecision {
        let amount = payroll_amount(entry);
        if amount.is_zero() {
            return DedupDecision::Keep(KeepReason::NoJournalMatch);
        }

        let matched = journal.iter().find(|jn| {
            if !is_payroll_or_cash(jn) {
                return false;
            }
            let other = payroll_amount(jn);
            !other.is_zero()
                && amounts_match_within_tolerance(amount, other, self.config.amount_tolerance)
                && within_days(entry.date, jn.date, self.config.payroll_match_window_days)
        });
        Self::exclude_on_match(matched)
    }

    fn decide_distribution(&self, entry: &LedgerEntry, journal: &[LedgerEntry]) -> DedupDecision {
        if entry.debit.is_zero() {
            return DedupDecision::Keep(KeepReason::NoJournalMatch);
        }

        let matched = journal.iter().find(|jn| {
            is_payroll_or_cash(jn)
                && !jn.credit.is_zero()
                && amounts_match_within_tolerance(entry.debit, jn.credit, self.config.amount_tolerance)
                && within_days(entry.date, jn.date, self.config.distribution_match_window_days)
        });
        Self::exclude_on_match(matched)
    }

    fn exclude_on_match(matched: Option<&LedgerEntry>) -> DedupDecision {
        match matched {
            Some(jn) => DedupDecision::Exclude(ExcludeReason::JournalMatch { journal_date: jn.date }),
            None => DedupDecision::Keep(KeepReason::NoJournalMatch),
        }
    }

    /// Merges both ledgers over an inclusive date range
    ///
    /// Balance problems in the plain-text ledger are logged and reported on
    /// the result; they never abort the merge. Journal entries come first and
    /// the sort is stable, so on equal dates journal rows precede plain-text
    /// rows.
    pub fn combined_ledger(&self, ledger: &Ledger, journals: &[Journal], range: DateRange) -> CombinedLedger {
        let validation_errors = ledger.validate_all();
        for error in &validation_errors {
            warn!(line = error.line(), %error, "Ledger transaction failed validation");
        }

        let mut balanced = ledger.clone();
        balanced.balance_all();

        let journal_entries: Vec<LedgerEntry> = self
            .unifier
            .from_journals(journals)
            .into_iter()
            .filter(|e| range.contains(e.date.date_naive()))
            .collect();

        let mut entries = journal_entries.clone();
        let mut beancount_excluded = 0;
        for entry in self.unifier.from_ledger(&balanced) {
            if !range.contains(entry.date.date_naive()) {
                continue;
            }
            if self.decide(&entry, &journal_entries).is_keep() {
                entries.push(entry);
            } else {
                beancount_excluded += 1;
            }
        }

        let journal_count = journal_entries.len();
        let beancount_kept = entries.len() - journal_count;
        entries.sort_by_key(|e| e.date);

        info!(
            start = %range.start,
            end = %range.end,
            journal_count,
            beancount_kept,
            beancount_excluded,
            "Built combined ledger"
        );

        CombinedLedger {
            entries,
            validation_errors,
            journal_count,
            beancount_kept,
            beancount_excluded,
        }
    }

    /// Compares cash in both ledgers as of a moment
    pub fn report(&self, ledger: &Ledger, journals: &[Journal], as_of: DateTime<Utc>) -> ReconciliationReport {
        let mut balanced = ledger.clone();
        balanced.balance_all();

        let beancount_cash = self.beancount_cash_balance(&balanced, as_of);

        let journal_entries: Vec<LedgerEntry> = self
            .unifier
            .from_journals(journals)
            .into_iter()
            .filter(|e| e.date <= as_of)
            .collect();
        let journal_cash: Decimal = journal_entries
            .iter()
            .filter(|e| e.account == codes::CASH)
            .map(LedgerEntry::net)
            .sum();

        let duplicates = self.potential_duplicates(&balanced, &journal_entries, as_of);

        let report = ReconciliationReport::new(beancount_cash, journal_cash, as_of).with_duplicates(duplicates);
        info!(
            as_of = %as_of,
            beancount = %report.cash_balance_beancount,
            journal = %report.cash_balance_journal_db,
            difference = %report.difference,
            duplicates = report.potential_duplicates.len(),
            "Generated reconciliation report"
        );
        report
    }

    fn beancount_cash_balance(&self, ledger: &Ledger, as_of: DateTime<Utc>) -> Decimal {
        ledger
            .transactions
            .iter()
            .filter(|tx| start_of_day(tx.date) <= as_of)
            .flat_map(|tx| tx.postings.iter())
            .filter(|p| p.account == self.config.checking_account)
            .map(|p| p.amount)
            .sum()
    }

    fn potential_duplicates(
        &self,
        ledger: &Ledger,
        journal: &[LedgerEntry],
        as_of: DateTime<Utc>,
    ) -> Vec<PotentialDuplicate> {
        let receipts = |e: &&LedgerEntry| e.account == codes::CASH && !e.debit.is_zero();
        let journal_receipts: Vec<&LedgerEntry> = journal.iter().filter(receipts).collect();

        let mut duplicates = Vec::new();
        for bc in self.unifier.from_ledger(ledger).iter().filter(|e| e.date <= as_of).filter(receipts) {
            for jn in &journal_receipts {
                if !within_days(bc.date, jn.date, self.config.duplicate_report_window_days)
                    || !amounts_match_within_tolerance(bc.debit, jn.debit, self.config.amount_tolerance)
                {
                    continue;
                }
                let confidence = if bc.date.date_naive() == jn.date.date_naive() && bc.debit == jn.debit {
                    Confidence::High
                } else {
                    Confidence::Medium
                };
                duplicates.push(PotentialDuplicate {
                    beancount_entry: bc.clone(),
                    journal_entry: (*jn).clone(),
                    confidence,
                });
            }
        }
        duplicates
    }

    /// Loads journal rows for the range through the port, then merges
    pub async fn combined_ledger_from<P: JournalPort + ?Sized>(
        &self,
        ledger: &Ledger,
        port: &P,
        range: DateRange,
    ) -> Result<CombinedLedger, ReconciliationError> {
        let window = Period::new(start_of_day(range.start), start_of_day(range.end) + chrono::Duration::days(1))?;
        let rows = port.journals_between(window.start, window.end).await?;
        Ok(self.combined_ledger(ledger, &rows, range))
    }

    /// Loads journal rows up to `as_of` through the port, then reports
    pub async fn report_from<P: JournalPort + ?Sized>(
        &self,
        ledger: &Ledger,
        port: &P,
        as_of: DateTime<Utc>,
    ) -> Result<ReconciliationReport, ReconciliationError> {
        let rows = port.journals_up_to(as_of).await?;
        Ok(self.report(ledger, &rows, as_of))
    }
}

/// Payroll legs compare on whichever side carries the amount, credit first
fn payroll_amount(entry: &LedgerEntry) -> Decimal {
    if entry.credit > Decimal::ZERO {
        entry.credit
    } else {
        entry.debit
    }
}

fn is_payroll_or_cash(entry: &LedgerEntry) -> bool {
    entry.account == codes::PAYROLL_EXPENSE || entry.account == codes::CASH
}
