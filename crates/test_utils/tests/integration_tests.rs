//! Cross-crate flows: billing bookings feeding reconciliation

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use core_kernel::{start_of_day, DateRange};
use domain_billing::{AssociationOutcome, BillingStateMachine, InvoiceState};
use domain_ledger::{codes, Ledger, LedgerEntryUnifier};
use domain_reconciliation::ports::mock::InMemoryJournalStore;
use domain_reconciliation::{Confidence, JournalPort, ReconciliationEngine};

use test_utils::*;

// ============================================================================
// Billing to Journal Tests
// ============================================================================

mod billing_to_journal_tests {
    use super::*;

    #[tokio::test]
    async fn test_paid_invoice_reconciles_with_bank_receipt() {
        let project = ProjectBuilder::new().build();
        let (code, rate, _) = BillingCodeBuilder::for_project(&project).build();
        let store = seeded_billing_store(&project, &code, [rate]).await;
        let machine = BillingStateMachine::new(store.clone());

        let mut invoice = None;
        for (day, minutes) in [(4, 60), (5, 30)] {
            let mut entry = EntryBuilder::on(&project, &code)
                .starting(TemporalFixtures::march_workday(day))
                .minutes(minutes)
                .build();
            match machine.associate_entry(&mut entry, project.id).await.unwrap() {
                AssociationOutcome::Associated { invoice_id } => invoice = Some(invoice_id),
                AssociationOutcome::Unaffiliated => panic!("entry left unaffiliated"),
            }
        }
        let invoice = invoice.unwrap();

        machine.create_invoice(project.id, TemporalFixtures::utc(2024, 4, 1, 0)).await.unwrap();
        machine.approve_invoice(invoice).await.unwrap();
        machine.send_invoice(invoice).await.unwrap();
        let paid = machine.mark_invoice_paid(invoice).await.unwrap();
        assert_eq!(paid.state, InvoiceState::Paid);
        assert_eq!(paid.total_amount.amount(), dec!(225));

        let rows = store.journals().await;
        assert_journals_balance(&rows);
        assert_account_net(&rows, codes::CASH, 22_500);
        assert_account_net(&rows, codes::ACCRUED_RECEIVABLES, 0);
        assert_account_net(&rows, codes::REVENUE, -22_500);

        // Bookings are stamped with the current time, so the bank side is too.
        let today = Utc::now().date_naive();
        let books = format!(
            "{today} * \"ORIG CO NAME:VANTA INC ENTRY DESCR:PAYMENT\"\n  \
             Assets:Checking:ChaseBusiness  225.00 USD\n  \
             Income:ClientBillables:Vanta\n"
        );
        let ledger = Ledger::parse(&books).unwrap();

        let journal = InMemoryJournalStore::new();
        journal.record(rows).await.unwrap();
        let engine = ReconciliationEngine::default();

        let report = engine.report_from(&ledger, &journal, Utc::now() + Duration::minutes(1)).await.unwrap();
        assert_reconciled(&report);
        assert_eq!(report.cash_balance_journal_db, dec!(225));
        assert_eq!(report.high_confidence_duplicates().count(), 1);
        assert_eq!(report.potential_duplicates[0].confidence, Confidence::High);

        let range = DateRange::new(today, today).unwrap();
        let combined = engine.combined_ledger_from(&ledger, &journal, range).await.unwrap();
        assert_eq!(combined.journal_count, 4);
        assert_eq!(combined.beancount_kept, 0);
        assert_eq!(combined.beancount_excluded, 2);
    }

    #[tokio::test]
    async fn test_voided_invoice_nets_to_zero() {
        let project = ProjectBuilder::new().named("Haberdash").build();
        let (code, rate, _) = BillingCodeBuilder::for_project(&project).build();
        let store = seeded_billing_store(&project, &code, [rate]).await;
        let machine = BillingStateMachine::new(store.clone());

        let mut entry = EntryBuilder::on(&project, &code).minutes(120).build();
        let AssociationOutcome::Associated { invoice_id } =
            machine.associate_entry(&mut entry, project.id).await.unwrap()
        else {
            panic!("entry left unaffiliated");
        };
        machine.create_invoice(project.id, TemporalFixtures::utc(2024, 4, 1, 0)).await.unwrap();
        machine.approve_invoice(invoice_id).await.unwrap();
        machine.void_invoice(invoice_id).await.unwrap();

        let rows = store.journals().await;
        assert_eq!(rows.len(), 4);
        assert_journals_balance(&rows);
        assert_account_net(&rows, codes::REVENUE, 0);
        assert_account_net(&rows, codes::ACCRUED_RECEIVABLES, 0);
        assert!(rows.iter().any(|r| r.memo.starts_with("REVERSAL:")));

        let report = ReconciliationEngine::default().report(&Ledger::default(), &rows, Utc::now());
        assert_reconciled(&report);
        assert!(report.potential_duplicates.is_empty());
    }
}

// ============================================================================
// Sample Books Tests
// ============================================================================

mod sample_books_tests {
    use super::*;

    fn february_journal() -> Vec<domain_ledger::Journal> {
        let feb = |d| TemporalFixtures::utc(2024, 2, d, 14);
        vec![
            JournalBuilder::debit(codes::CASH, 450_000).at(feb(2)).sub_account("Vanta").build(),
            JournalBuilder::credit(codes::ACCRUED_RECEIVABLES, 450_000).at(feb(2)).sub_account("Vanta").build(),
            JournalBuilder::debit(codes::PAYROLL_EXPENSE, 300_000).at(feb(14)).memo("Payroll run").build(),
            JournalBuilder::credit(codes::CASH, 300_000).at(feb(14)).memo("Payroll run").build(),
        ]
    }

    #[test]
    fn test_combined_ledger_over_sample_books() {
        let ledger = LedgerFixtures::sample_ledger();
        let journal = february_journal();
        let range = DateRange::new(TemporalFixtures::date(2024, 2, 1), TemporalFixtures::date(2024, 2, 29)).unwrap();

        let combined = ReconciliationEngine::default().combined_ledger(&ledger, &journal, range);

        assert!(combined.validation_errors.is_empty());
        assert_eq!(combined.journal_count, 4);
        assert_eq!(combined.beancount_kept, 4);
        assert_eq!(combined.beancount_excluded, 4);
        assert!(combined.entries.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_individual_decisions() {
        let mut ledger = LedgerFixtures::sample_ledger();
        ledger.balance_all();
        let unifier = LedgerEntryUnifier::default();
        let journal = unifier.from_journals(&february_journal());
        let engine = ReconciliationEngine::default();

        for entry in unifier.from_ledger(&ledger) {
            let decision = engine.decide(&entry, &journal);
            match (entry.account.as_str(), entry.description.as_str()) {
                (codes::CASH, "Payment to Chase Card ending 1234") => assert_kept(&decision, &entry),
                (codes::CASH, "Monthly fees") => assert_kept(&decision, &entry),
                (codes::CASH, _) => assert_excluded(&decision, &entry),
                (codes::REVENUE, _) | (codes::PAYROLL_EXPENSE, _) => assert_excluded(&decision, &entry),
                _ => assert_kept(&decision, &entry),
            }
        }
    }

    #[test]
    fn test_report_as_of_month_end() {
        let ledger = LedgerFixtures::sample_ledger();
        let as_of = start_of_day(TemporalFixtures::date(2024, 3, 1)) - Duration::seconds(1);

        let report = ReconciliationEngine::default().report(&ledger, &february_journal(), as_of);

        assert_eq!(report.cash_balance_beancount, dec!(637.90));
        assert_eq!(report.cash_balance_journal_db, dec!(1500.00));
        assert_eq!(report.difference, dec!(-862.10));
        assert!(!report.is_balanced());
        assert_eq!(report.high_confidence_duplicates().count(), 1);
    }
}
