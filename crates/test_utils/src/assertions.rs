//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than bare `assert!`.

use core_kernel::Money;
use domain_ledger::{verify_journal_balance, Journal, LedgerEntry};
use domain_reconciliation::{DedupDecision, ReconciliationReport};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that debits equal credits across the rows
pub fn assert_journals_balance(rows: &[Journal]) {
    if let Err(err) = verify_journal_balance(rows) {
        panic!("Journal rows do not balance over {} rows: {err}", rows.len());
    }
}

/// Asserts the net (debit minus credit) of one account, in minor units
pub fn assert_account_net(rows: &[Journal], account: &str, expected_minor: i64) {
    let net: i64 = rows.iter().filter(|r| r.account == account).map(Journal::net_minor).sum();
    assert_eq!(net, expected_minor, "Unexpected net for account {account}");
}

/// Asserts that a plain-text entry survived deduplication
pub fn assert_kept(decision: &DedupDecision, entry: &LedgerEntry) {
    assert!(
        decision.is_keep(),
        "Expected '{}' on {} to be kept, got {}",
        entry.description,
        entry.date.date_naive(),
        decision.label()
    );
}

/// Asserts that a plain-text entry was recognised as already journaled
pub fn assert_excluded(decision: &DedupDecision, entry: &LedgerEntry) {
    assert!(
        decision.is_exclude(),
        "Expected '{}' on {} to be excluded, got {}",
        entry.description,
        entry.date.date_naive(),
        decision.label()
    );
}

/// Asserts that both ledgers agree on cash
pub fn assert_reconciled(report: &ReconciliationReport) {
    assert!(
        report.is_balanced(),
        "Cash differs: plain-text={}, journal={}, difference={}",
        report.cash_balance_beancount,
        report.cash_balance_journal_db,
        report.difference
    );
}
