//! Integration tests for domain_ledger

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_ledger::codes;
use domain_ledger::{
    AccountMapper, BalanceError, EntrySource, Journal, Ledger, LedgerEntryUnifier, LedgerError,
    ParseErrorKind,
};

const SAMPLE: &str = r#"
; Company books
option "operating_currency" "USD"
2024-01-01 open Assets:Checking:ChaseBusiness USD
2024-01-01 open Expenses:Vendors:Acme

2024-01-15 * "Acme" "Consulting" #proj
  Assets:Checking:ChaseBusiness  -100.00 USD
  Expenses:Vendors:Acme

2024-01-20 ! "Client payment" #ar
  Assets:Checking:ChaseBusiness   5,000.00 USD
  Income:ClientBillables:Vanta   -5,000.00 USD

2024-01-31 balance Assets:Checking:ChaseBusiness 4,900.00 USD
"#;

// ============================================================================
// Parsing Tests
// ============================================================================

mod parsing_tests {
    use super::*;

    #[test]
    fn test_sample_summary() {
        let ledger = Ledger::parse(SAMPLE).unwrap();
        let summary = ledger.summary();

        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.accounts, 2);
        assert_eq!(summary.balance_assertions, 1);
        assert!(ledger.source_path.is_none());
    }

    #[test]
    fn test_header_round_trip_with_inferred_posting() {
        let mut ledger = Ledger::parse(SAMPLE).unwrap();
        let tx = &mut ledger.transactions[0];

        assert_eq!(tx.payee.as_deref(), Some("Acme"));
        assert_eq!(tx.description, "Consulting");
        assert_eq!(tx.tags, vec!["proj"]);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        tx.balance_postings().unwrap();
        assert_eq!(tx.postings[1].amount, dec!(100.00));
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_consulting_description_when_single_quoted_string() {
        let text = "2024-01-15 * \"Consulting\" #proj\n  Assets:Checking:ChaseBusiness -100.00 USD\n  Expenses:Vendors:Acme\n";
        let mut ledger = Ledger::parse(text).unwrap();
        assert_eq!(ledger.transactions[0].description, "Consulting");

        assert!(ledger.balance_all().is_empty());
        assert_eq!(ledger.transactions[0].postings[1].amount, dec!(100.00));
    }

    #[test]
    fn test_parse_aborts_on_first_error() {
        let text = "2024-01-15 * \"ok\"\n  Assets:Cash 1 USD\n2024-02-30 * \"bad date\"\n  Assets:Cash abc USD\n";
        let err = Ledger::parse(text).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, ParseErrorKind::InvalidDate(_)));
    }

    #[test]
    fn test_from_bytes_tolerates_invalid_utf8_in_comments() {
        let mut bytes = b"; caf\xe9\n".to_vec();
        bytes.extend_from_slice(b"2024-01-15 * \"x\"\n  Assets:Cash 1 USD\n  Income:Other -1 USD\n");
        let ledger = Ledger::from_bytes(&bytes).unwrap();
        assert_eq!(ledger.transactions.len(), 1);
    }
}

// ============================================================================
// File Loading Tests
// ============================================================================

mod file_tests {
    use super::*;

    #[test]
    fn test_from_path_records_source() {
        let path = std::env::temp_dir().join(format!("ledger-{}.beancount", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();

        let ledger = Ledger::from_path(&path).unwrap();
        assert_eq!(ledger.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(ledger.transactions.len(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Ledger::from_path("/nonexistent/books.beancount");
        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_validate_all_lists_every_failure() {
        let text = "\
2024-01-01 * \"unbalanced\"
  Assets:Cash 10 USD
  Expenses:A -9 USD
2024-01-02 * \"ambiguous\"
  Assets:Cash
  Expenses:A
2024-01-03 * \"fine\"
  Assets:Cash -5 USD
  Expenses:A
";
        let ledger = Ledger::parse(text).unwrap();
        let errors = ledger.validate_all();

        assert_eq!(
            errors,
            vec![
                BalanceError::Unbalanced { sum: dec!(1), line: 1 },
                BalanceError::MultipleInferredAmounts { line: 4 },
            ]
        );
    }
}

// ============================================================================
// Mapping and Unification Tests
// ============================================================================

mod unification_tests {
    use super::*;

    #[test]
    fn test_map_examples() {
        let mapper = AccountMapper::default();
        assert_eq!(mapper.map("Expenses:Fees:Stripe"), "OPERATING_EXPENSES_FEES");
        assert_eq!(mapper.map("Foo:Bar"), "UNCLASSIFIED");
    }

    #[test]
    fn test_ledger_to_entries() {
        let mut ledger = Ledger::parse(SAMPLE).unwrap();
        ledger.balance_all();
        let entries = LedgerEntryUnifier::default().from_ledger(&ledger);

        assert_eq!(entries.len(), 4);

        let vendor = &entries[1];
        assert_eq!(vendor.account, codes::OPERATING_EXPENSES_VENDORS);
        assert_eq!(vendor.sub_account, "Acme");
        assert_eq!(vendor.debit, dec!(100.00));

        let revenue = &entries[3];
        assert_eq!(revenue.account, codes::REVENUE);
        assert_eq!(revenue.sub_account, "Vanta");
        assert_eq!(revenue.debit, dec!(5000.00));
        assert_eq!(revenue.credit, Decimal::ZERO);
        assert_eq!(revenue.tags, vec!["ar"]);
    }

    #[test]
    fn test_every_unified_entry_is_one_sided() {
        let mut ledger = Ledger::parse(SAMPLE).unwrap();
        ledger.balance_all();
        for entry in LedgerEntryUnifier::default().from_ledger(&ledger) {
            assert!(entry.debit.is_zero() || entry.credit.is_zero());
            assert!(entry.debit >= Decimal::ZERO && entry.credit >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_journals_to_entries_carry_links() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let rows = vec![
            Journal::debit(codes::CASH, 500_000, at).with_sub_account("Vanta"),
            Journal::credit(codes::ACCRUED_RECEIVABLES, 500_000, at).with_sub_account("Vanta"),
        ];
        let entries = LedgerEntryUnifier::default().from_journals(&rows);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.source == EntrySource::JournalDb));
        assert_eq!(entries[1].credit, dec!(5000.00));
        assert_eq!(entries[0].sub_account, "Vanta");
    }
}
