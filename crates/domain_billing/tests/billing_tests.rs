//! Lifecycle tests for domain_billing

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, EmployeeId, Money, Period};
use domain_ledger::{codes, verify_journal_balance};

use domain_billing::ports::mock::InMemoryBillingStore;
use domain_billing::{
    AssociationOutcome, BillingCode, BillingError, BillingPort, BillingStateMachine, BudgetDecision,
    BudgetPeriod, Entry, EntryState, Invoice, InvoiceState, InvoiceType, Project, Rate,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

struct Fixture {
    store: Arc<InMemoryBillingStore>,
    machine: BillingStateMachine<InMemoryBillingStore>,
    project: Project,
    code: BillingCode,
}

impl Fixture {
    async fn new() -> Self {
        Self::with_code(|code| code).await
    }

    async fn with_code(customise: impl FnOnce(BillingCode) -> BillingCode) -> Self {
        let active = Period::new(at(2024, 1, 10, 0), at(2025, 1, 1, 0)).unwrap();
        let project = Project::new("Vanta", active);
        let rate = Rate::new("Standard", Money::new(dec!(100), Currency::USD));
        let code = customise(BillingCode::new(project.id, "VANTA-ENG", rate.id, active));

        let store = Arc::new(InMemoryBillingStore::new());
        store.insert_project(project.clone()).await;
        store.insert_rate(rate).await;
        store.insert_billing_code(code.clone()).await;

        Self {
            machine: BillingStateMachine::new(store.clone()),
            store,
            project,
            code,
        }
    }

    fn entry(&self, start: DateTime<Utc>, minutes: i64) -> Entry {
        Entry::new(
            self.project.id,
            EmployeeId::new(),
            self.code.id,
            start,
            start + Duration::minutes(minutes),
        )
    }

    async fn associate(&self, entry: &mut Entry) -> AssociationOutcome {
        self.machine.associate_entry(entry, self.project.id).await.unwrap()
    }
}

fn invoice_id(outcome: AssociationOutcome) -> core_kernel::InvoiceId {
    match outcome {
        AssociationOutcome::Associated { invoice_id } => invoice_id,
        AssociationOutcome::Unaffiliated => panic!("entry was not associated"),
    }
}

// ============================================================================
// Rollover Tests
// ============================================================================

mod rollover_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_rollover_backdates_receivable() {
        let fx = Fixture::new().await;
        let rollover = fx.machine.create_invoice(fx.project.id, at(2024, 3, 15, 0)).await.unwrap();

        assert_eq!(rollover.receivable.invoice_type, InvoiceType::AccountsReceivable);
        assert_eq!(rollover.receivable.period.start, at(2024, 1, 10, 0));
        assert_eq!(rollover.receivable.period.end, at(2024, 4, 1, 0));
        assert_eq!(rollover.payable.period.start, at(2024, 3, 1, 0));
        assert_eq!(rollover.receivable.state, InvoiceState::Draft);
        assert!(rollover.closed.is_empty());
        assert_eq!(fx.store.invoice_count().await, 2);
    }

    #[tokio::test]
    async fn test_second_rollover_for_same_date_overlaps() {
        let fx = Fixture::new().await;
        fx.machine.create_invoice(fx.project.id, at(2024, 3, 15, 0)).await.unwrap();

        let err = fx.machine.create_invoice(fx.project.id, at(2024, 3, 15, 0)).await.unwrap_err();
        assert!(matches!(err, BillingError::InvoiceOverlap { new_start, .. } if new_start == at(2024, 3, 1, 0)));
        assert_eq!(fx.store.invoice_count().await, 2);
    }

    #[tokio::test]
    async fn test_next_month_moves_drafts_and_entries_to_pending() {
        let fx = Fixture::new().await;
        let mut entry = fx.entry(at(2024, 3, 4, 9), 60);
        let march = invoice_id(fx.associate(&mut entry).await);

        let rollover = fx.machine.create_invoice(fx.project.id, at(2024, 4, 2, 0)).await.unwrap();
        assert_eq!(rollover.closed.len(), 2);
        assert_eq!(rollover.receivable.period.start, at(2024, 4, 1, 0));

        let march = fx.store.get_invoice(march).await.unwrap();
        assert_eq!(march.state, InvoiceState::Pending);
        assert_eq!(march.total_amount.amount(), dec!(100));
        assert_eq!(fx.store.get_entry(entry.id).await.unwrap().state, EntryState::Pending);
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let fx = Fixture::new().await;
        let err = fx
            .machine
            .create_invoice(core_kernel::ProjectId::new(), at(2024, 3, 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NotFound { .. }));
    }
}

// ============================================================================
// Association Tests
// ============================================================================

mod association_tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_before_active_start_is_rejected() {
        let fx = Fixture::new().await;
        let mut entry = fx.entry(at(2024, 1, 5, 9), 60);

        let err = fx.machine.associate_entry(&mut entry, fx.project.id).await.unwrap_err();
        assert!(matches!(err, BillingError::EntryOutOfRange { .. }));
        assert!(entry.invoice_id.is_none());
        assert!(fx.store.get_entry(entry.id).await.is_err());
        assert_eq!(fx.store.invoice_count().await, 0);
    }

    #[tokio::test]
    async fn test_association_rolls_over_and_prices_entry() {
        let fx = Fixture::new().await;
        let mut entry = fx.entry(at(2024, 3, 4, 9), 16);

        let invoice = invoice_id(fx.associate(&mut entry).await);
        let stored = fx.store.get_entry(entry.id).await.unwrap();

        assert_eq!(stored.invoice_id, Some(invoice));
        assert_eq!(stored.state, EntryState::Draft);
        assert_eq!(stored.fee.amount(), dec!(25.00));
        assert_eq!(stored.duration_minutes, dec!(16));
    }

    #[tokio::test]
    async fn test_pending_invoice_wins_over_draft() {
        let fx = Fixture::new().await;
        let period = Period::month_containing(at(2024, 3, 1, 0)).unwrap();

        let draft = Invoice::draft(fx.project.id, "Vanta", period, InvoiceType::AccountsReceivable);
        let mut pending = Invoice::draft(fx.project.id, "Vanta", period, InvoiceType::AccountsReceivable);
        pending.transition_to(InvoiceState::Pending).unwrap();
        fx.store.save_invoice(&draft).await.unwrap();
        fx.store.save_invoice(&pending).await.unwrap();

        let mut entry = fx.entry(at(2024, 3, 20, 9), 30);
        assert_eq!(
            fx.associate(&mut entry).await,
            AssociationOutcome::Associated { invoice_id: pending.id }
        );
    }

    #[tokio::test]
    async fn test_closed_invoices_are_not_eligible() {
        let fx = Fixture::new().await;
        let period = Period::month_containing(at(2024, 3, 1, 0)).unwrap();
        let mut sent = Invoice::draft(fx.project.id, "Vanta", period, InvoiceType::AccountsReceivable);
        sent.state = InvoiceState::Sent;
        fx.store.save_invoice(&sent).await.unwrap();

        let mut entry = fx.entry(at(2024, 3, 20, 9), 30);
        let chosen = invoice_id(fx.associate(&mut entry).await);
        assert_ne!(chosen, sent.id);
    }

    #[tokio::test]
    async fn test_internal_entry_goes_to_payable_invoice() {
        let fx = Fixture::new().await;
        let mut entry = fx.entry(at(2024, 3, 4, 9), 60).internal();

        let invoice = invoice_id(fx.associate(&mut entry).await);
        let invoice = fx.store.get_invoice(invoice).await.unwrap();
        assert_eq!(invoice.invoice_type, InvoiceType::AccountsPayable);
    }

    #[tokio::test]
    async fn test_backfill_continues_past_failures() {
        let fx = Fixture::new().await;
        let good = [fx.entry(at(2024, 3, 4, 9), 60), fx.entry(at(2024, 3, 5, 9), 30)];
        let late = fx.entry(at(2025, 2, 1, 9), 30);
        for entry in good.iter().chain(std::iter::once(&late)) {
            fx.store.save_entry(entry).await.unwrap();
        }

        let summary = fx.machine.backfill_project(fx.project.id).await.unwrap();
        assert_eq!(summary.associated, 2);
        assert_eq!(summary.unaffiliated, 0);
        assert_eq!(summary.failed, vec![late.id]);
        assert!(fx.store.get_entry(late.id).await.unwrap().invoice_id.is_none());
    }
}

// ============================================================================
// Transition Tests
// ============================================================================

mod transition_tests {
    use super::*;

    async fn pending_march_invoice(fx: &Fixture) -> (core_kernel::InvoiceId, Vec<Entry>) {
        let mut entries = vec![fx.entry(at(2024, 3, 4, 9), 16), fx.entry(at(2024, 3, 5, 9), 60)];
        let mut invoice = None;
        for entry in entries.iter_mut() {
            invoice = Some(invoice_id(fx.associate(entry).await));
        }
        fx.machine.create_invoice(fx.project.id, at(2024, 4, 1, 0)).await.unwrap();
        (invoice.unwrap(), entries)
    }

    #[tokio::test]
    async fn test_approve_requires_pending() {
        let fx = Fixture::new().await;
        let rollover = fx.machine.create_invoice(fx.project.id, at(2024, 3, 1, 0)).await.unwrap();

        let err = fx.machine.approve_invoice(rollover.receivable.id).await.unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidPriorState {
                current: InvoiceState::Draft,
                required: InvoiceState::Pending,
                requested: InvoiceState::Approved,
                ..
            }
        ));
        let stored = fx.store.get_invoice(rollover.receivable.id).await.unwrap();
        assert_eq!(stored.state, InvoiceState::Draft);
        assert!(fx.store.journals().await.is_empty());
    }

    #[tokio::test]
    async fn test_full_receivable_lifecycle_books_journal() {
        let fx = Fixture::new().await;
        let (invoice, entries) = pending_march_invoice(&fx).await;

        let approved = fx.machine.approve_invoice(invoice).await.unwrap();
        assert_eq!(approved.total_amount.amount(), dec!(125));
        for entry in &entries {
            assert_eq!(fx.store.get_entry(entry.id).await.unwrap().state, EntryState::Approved);
        }

        fx.machine.send_invoice(invoice).await.unwrap();
        assert_eq!(fx.store.get_entry(entries[0].id).await.unwrap().state, EntryState::Approved);

        let paid = fx.machine.mark_invoice_paid(invoice).await.unwrap();
        assert_eq!(paid.state, InvoiceState::Paid);
        assert_eq!(fx.store.get_entry(entries[1].id).await.unwrap().state, EntryState::Paid);

        let journals = fx.store.journals().await;
        assert_eq!(journals.len(), 4);
        assert!(verify_journal_balance(&journals).is_ok());
        let cash: i64 = journals.iter().filter(|j| j.account == codes::CASH).map(|j| j.net_minor()).sum();
        assert_eq!(cash, 12_500);
        let receivable: i64 = journals
            .iter()
            .filter(|j| j.account == codes::ACCRUED_RECEIVABLES)
            .map(|j| j.net_minor())
            .sum();
        assert_eq!(receivable, 0);
        assert!(journals.iter().all(|j| j.sub_account == "Vanta" && j.invoice_id == Some(invoice)));
    }

    #[tokio::test]
    async fn test_send_out_of_order_fails() {
        let fx = Fixture::new().await;
        let (invoice, _) = pending_march_invoice(&fx).await;
        assert!(matches!(
            fx.machine.mark_invoice_paid(invoice).await,
            Err(BillingError::InvalidPriorState { current: InvoiceState::Pending, required: InvoiceState::Sent, .. })
        ));
    }

    #[tokio::test]
    async fn test_paid_requires_sent_not_approved() {
        let fx = Fixture::new().await;
        let (invoice, entries) = pending_march_invoice(&fx).await;
        fx.machine.approve_invoice(invoice).await.unwrap();

        let err = fx.machine.mark_invoice_paid(invoice).await.unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidPriorState {
                current: InvoiceState::Approved,
                required: InvoiceState::Sent,
                requested: InvoiceState::Paid,
                ..
            }
        ));
        assert_eq!(fx.store.get_invoice(invoice).await.unwrap().state, InvoiceState::Approved);
        assert_eq!(fx.store.get_entry(entries[0].id).await.unwrap().state, EntryState::Approved);
        assert_eq!(fx.store.journals().await.len(), 2);
    }

    #[tokio::test]
    async fn test_send_leaves_entries_approved() {
        let fx = Fixture::new().await;
        let (invoice, entries) = pending_march_invoice(&fx).await;
        fx.machine.approve_invoice(invoice).await.unwrap();

        let sent = fx.machine.send_invoice(invoice).await.unwrap();
        assert_eq!(sent.state, InvoiceState::Sent);
        for entry in &entries {
            assert_eq!(fx.store.get_entry(entry.id).await.unwrap().state, EntryState::Approved);
        }
        assert_eq!(fx.store.journals().await.len(), 2);
    }

    #[tokio::test]
    async fn test_void_cascades_and_reverses_bookings() {
        let fx = Fixture::new().await;
        let (invoice, entries) = pending_march_invoice(&fx).await;
        fx.machine.approve_invoice(invoice).await.unwrap();

        let voided = fx.machine.void_invoice(invoice).await.unwrap();
        assert_eq!(voided.state, InvoiceState::Void);
        assert_eq!(fx.store.get_entry(entries[0].id).await.unwrap().state, EntryState::Void);

        let journals = fx.store.journals().await;
        assert_eq!(journals.len(), 4);
        let revenue: i64 = journals.iter().filter(|j| j.account == codes::REVENUE).map(|j| j.net_minor()).sum();
        assert_eq!(revenue, 0);

        fx.machine.void_invoice(invoice).await.unwrap();
        assert_eq!(fx.store.journals().await.len(), 4);
    }

    #[tokio::test]
    async fn test_payable_approval_books_nothing() {
        let fx = Fixture::new().await;
        let mut entry = fx.entry(at(2024, 3, 4, 9), 60).internal();
        let payable = invoice_id(fx.associate(&mut entry).await);
        fx.machine.create_invoice(fx.project.id, at(2024, 4, 1, 0)).await.unwrap();

        fx.machine.approve_invoice(payable).await.unwrap();
        assert!(fx.store.journals().await.is_empty());
    }
}

// ============================================================================
// Budget Tests
// ============================================================================

mod budget_tests {
    use super::*;

    #[tokio::test]
    async fn test_monthly_budget_exceeded() {
        let fx = Fixture::with_code(|code| code.with_budget(dec!(1), BudgetPeriod::Monthly)).await;
        let first = fx.entry(at(2024, 3, 4, 9), 45);
        let second = fx.entry(at(2024, 3, 5, 9), 30);
        let february = fx.entry(at(2024, 2, 5, 9), 600);
        for entry in [&first, &second, &february] {
            fx.store.save_entry(entry).await.unwrap();
        }

        let decision = fx.machine.check_budget(&second).await.unwrap();
        assert_eq!(
            decision,
            BudgetDecision::OverBudget {
                budget_hours: dec!(1),
                billed_hours: dec!(1.25),
                overage_hours: dec!(0.25),
            }
        );
    }

    #[tokio::test]
    async fn test_no_budget_never_alerts() {
        let fx = Fixture::new().await;
        let entry = fx.entry(at(2024, 3, 4, 9), 6000);
        fx.store.save_entry(&entry).await.unwrap();
        assert_eq!(fx.machine.check_budget(&entry).await.unwrap(), BudgetDecision::WithinBudget);
    }
}
