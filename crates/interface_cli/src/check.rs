//! The `ledger-check` diagnostic
//!
//! Loads the configured ledger, reports how it parsed and balanced, and
//! reconciles it against a journal export when one is configured.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

use core_kernel::{start_of_day, DateRange};
use domain_ledger::{BalanceError, Journal, Ledger, LedgerEntryUnifier, LedgerSummary};
use domain_reconciliation::{ReconciliationEngine, ReconciliationReport};

use crate::config::AppConfig;
use crate::error::CliError;

/// Validation errors listed before the output is truncated
pub const MAX_LISTED_ERRORS: usize = 10;

/// What one run found
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub summary: LedgerSummary,
    pub validation_errors: Vec<BalanceError>,
    /// Entries produced from the plain-text ledger alone
    pub entry_count: usize,
    pub reconciliation: Option<Reconciliation>,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub range: DateRange,
    pub combined_entries: usize,
    pub journal_entries: usize,
    pub excluded_entries: usize,
    pub report: ReconciliationReport,
}

/// Runs the diagnostic against the configured files
pub fn run_check(config: &AppConfig) -> Result<CheckOutcome, CliError> {
    let mut ledger = Ledger::from_path(&config.ledger_path)?;
    let summary = ledger.summary();
    let validation_errors = ledger.validate_all();

    let engine = ReconciliationEngine::new(config.reconciliation.clone());
    let reconciliation = match &config.journals_path {
        Some(path) => Some(reconcile(&engine, &ledger, &read_journals(path)?, config.as_of_date())?),
        None => None,
    };

    ledger.balance_all();
    let entry_count = LedgerEntryUnifier::default().from_ledger(&ledger).len();

    info!(
        transactions = summary.transactions,
        invalid = validation_errors.len(),
        entries = entry_count,
        "Ledger check finished"
    );

    Ok(CheckOutcome {
        summary,
        validation_errors,
        entry_count,
        reconciliation,
    })
}

fn read_journals(path: &Path) -> Result<Vec<Journal>, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::JournalExport {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CliError::JournalFormat {
        path: path.to_path_buf(),
        source,
    })
}

fn reconcile(
    engine: &ReconciliationEngine,
    ledger: &Ledger,
    journals: &[Journal],
    as_of: NaiveDate,
) -> Result<Reconciliation, CliError> {
    let earliest = ledger
        .transactions
        .iter()
        .map(|tx| tx.date)
        .chain(journals.iter().map(|j| j.created_at.date_naive()))
        .min()
        .unwrap_or(as_of);
    let range = DateRange::new(earliest.min(as_of), as_of)?;

    let combined = engine.combined_ledger(ledger, journals, range);
    let report = engine.report(ledger, journals, end_of_day(as_of));

    Ok(Reconciliation {
        range,
        combined_entries: combined.entries.len(),
        journal_entries: combined.journal_count,
        excluded_entries: combined.beancount_excluded,
        report,
    })
}

/// Last second of the day, so rows booked during `date` are counted
fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::seconds(1)
}

/// Writes the human-readable summary, with the report as JSON
pub fn render(outcome: &CheckOutcome, out: &mut impl Write) -> Result<(), CliError> {
    let summary = &outcome.summary;
    writeln!(out, "Transactions:       {}", summary.transactions)?;
    writeln!(out, "Accounts opened:    {}", summary.accounts)?;
    writeln!(out, "Balance assertions: {}", summary.balance_assertions)?;

    if outcome.validation_errors.is_empty() {
        writeln!(out, "All transactions balance")?;
    } else {
        writeln!(out, "Validation errors:  {}", outcome.validation_errors.len())?;
        for error in outcome.validation_errors.iter().take(MAX_LISTED_ERRORS) {
            writeln!(out, "  {error}")?;
        }
        let hidden = outcome.validation_errors.len().saturating_sub(MAX_LISTED_ERRORS);
        if hidden > 0 {
            writeln!(out, "  ... and {hidden} more")?;
        }
    }
    writeln!(out, "Ledger entries:     {}", outcome.entry_count)?;

    if let Some(rec) = &outcome.reconciliation {
        writeln!(out, "Combined ledger {} to {}: {} entries", rec.range.start, rec.range.end, rec.combined_entries)?;
        writeln!(out, "  from journal:     {}", rec.journal_entries)?;
        writeln!(out, "  deduplicated:     {}", rec.excluded_entries)?;
        writeln!(out, "{}", serde_json::to_string_pretty(&rec.report)?)?;
    }
    Ok(())
}
