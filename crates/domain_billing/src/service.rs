//! Invoice and entry lifecycle
//!
//! `BillingStateMachine` owns every state change of invoices and entries.
//! Rollover and association for one project are serialised behind a
//! per-project lock: the overlap check, the Draft to Pending cascade and the
//! creation of the new drafts happen as one unit with respect to other
//! callers on the same project.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use core_kernel::{EntryId, InvoiceId, ProjectId};

use crate::billing_code::{fee_for, BudgetCheck, BudgetDecision};
use crate::bookings::{approval_rows, payment_rows};
use crate::entry::{Entry, EntryState};
use crate::error::BillingError;
use crate::invoice::{Invoice, InvoiceState, InvoiceType};
use crate::ports::BillingPort;
use crate::project::Project;

/// Result of associating an entry with an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssociationOutcome {
    Associated { invoice_id: InvoiceId },
    /// No open invoice could take the entry
    Unaffiliated,
}

/// Invoices created by one rollover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollover {
    pub receivable: Invoice,
    pub payable: Invoice,
    /// Former drafts now pending
    pub closed: Vec<InvoiceId>,
}

/// Per-entry results of a backfill run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub associated: usize,
    pub unaffiliated: usize,
    pub failed: Vec<EntryId>,
}

pub struct BillingStateMachine<P: BillingPort> {
    port: Arc<P>,
    project_locks: Mutex<HashMap<ProjectId, Arc<Mutex<()>>>>,
}

impl<P: BillingPort> BillingStateMachine<P> {
    pub fn new(port: Arc<P>) -> Self {
        Self {
            port,
            project_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn port(&self) -> &Arc<P> {
        &self.port
    }

    async fn project_lock(&self, project_id: ProjectId) -> Arc<Mutex<()>> {
        let mut locks = self.project_locks.lock().await;
        locks.entry(project_id).or_default().clone()
    }

    /// Starts a new billing period for a project
    ///
    /// Existing drafts (and their entries) move to Pending, then one
    /// receivable and one payable draft are created for the period that
    /// contains `at`.
    ///
    /// # Errors
    ///
    /// `BillingError::InvoiceOverlap` when a draft of the project ends after
    /// the new period starts. Nothing is changed in that case.
    pub async fn create_invoice(
        &self,
        project_id: ProjectId,
        at: DateTime<Utc>,
    ) -> Result<Rollover, BillingError> {
        let lock = self.project_lock(project_id).await;
        let _guard = lock.lock().await;
        let project = self.port.get_project(project_id).await?;
        self.rollover(&project, at).await
    }

    async fn rollover(&self, project: &Project, at: DateTime<Utc>) -> Result<Rollover, BillingError> {
        let period = project.billing_period(at)?;

        let mut drafts: Vec<Invoice> = self
            .port
            .invoices_for_project(project.id)
            .await?
            .into_iter()
            .filter(|i| i.state == InvoiceState::Draft)
            .collect();
        drafts.sort_by(|a, b| b.period.end.cmp(&a.period.end));

        if let Some(latest) = drafts.first() {
            if latest.period.end > period.start {
                warn!(
                    project_id = %project.id,
                    existing = %latest.id,
                    new_start = %period.start,
                    "Invoice rollover rejected: overlapping draft"
                );
                return Err(BillingError::InvoiceOverlap {
                    project: project.id,
                    existing: latest.id,
                    existing_end: latest.period.end,
                    new_start: period.start,
                });
            }
        }

        let mut closed = Vec::with_capacity(drafts.len());
        for mut draft in drafts {
            self.advance(&mut draft, InvoiceState::Pending).await?;
            closed.push(draft.id);
        }

        // A project's first receivable draft also covers time logged before
        // the current period, back to the start of the project.
        let receivable_period = if closed.is_empty() && project.active.start < period.start {
            period.with_start(project.active.start)?
        } else {
            period
        };

        let receivable = Invoice::draft(project.id, &project.name, receivable_period, InvoiceType::AccountsReceivable);
        let payable = Invoice::draft(project.id, &project.name, period, InvoiceType::AccountsPayable);
        self.port.save_invoice(&receivable).await?;
        self.port.save_invoice(&payable).await?;

        info!(
            project_id = %project.id,
            receivable = %receivable.id,
            payable = %payable.id,
            period_start = %period.start,
            closed = closed.len(),
            "Rolled over billing period"
        );

        Ok(Rollover { receivable, payable, closed })
    }

    /// Applies a transition and cascades the new state to the invoice's entries
    async fn advance(&self, invoice: &mut Invoice, next: InvoiceState) -> Result<Vec<Entry>, BillingError> {
        invoice.transition_to(next)?;

        let mut entries = self.port.entries_for_invoice(invoice.id).await?;
        for entry in entries.iter_mut() {
            entry.state = EntryState::from(next);
            self.port.save_entry(entry).await?;
        }

        let adjustments = self.port.adjustments_for_invoice(invoice.id).await?;
        invoice.recalculate_totals(&entries, &adjustments)?;
        self.port.save_invoice(invoice).await?;

        info!(invoice_id = %invoice.id, state = ?next, entries = entries.len(), "Invoice transitioned");
        Ok(entries)
    }

    async fn project_name(&self, invoice: &Invoice) -> Result<String, BillingError> {
        Ok(self.port.get_project(invoice.project_id).await?.name)
    }

    /// Pending to Approved; books the receivable accrual
    pub async fn approve_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.port.get_invoice(invoice_id).await?;
        self.advance(&mut invoice, InvoiceState::Approved).await?;

        let rows = approval_rows(&invoice, &self.project_name(&invoice).await?, Utc::now())?;
        if !rows.is_empty() {
            self.port.record_journals(rows).await?;
        }
        Ok(invoice)
    }

    /// Approved to Sent; entries keep their state
    pub async fn send_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.port.get_invoice(invoice_id).await?;
        invoice.transition_to(InvoiceState::Sent)?;
        self.port.save_invoice(&invoice).await?;
        info!(invoice_id = %invoice.id, "Invoice sent");
        Ok(invoice)
    }

    /// Sent to Paid; books the cash receipt
    pub async fn mark_invoice_paid(&self, invoice_id: InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.port.get_invoice(invoice_id).await?;
        self.advance(&mut invoice, InvoiceState::Paid).await?;

        let rows = payment_rows(&invoice, &self.project_name(&invoice).await?, Utc::now())?;
        if !rows.is_empty() {
            self.port.record_journals(rows).await?;
        }
        Ok(invoice)
    }

    /// Voids an invoice from any state and reverses what it booked
    pub async fn void_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.port.get_invoice(invoice_id).await?;
        let already_void = invoice.state == InvoiceState::Void;
        self.advance(&mut invoice, InvoiceState::Void).await?;
        if already_void {
            return Ok(invoice);
        }

        let booked = self.port.journals_for_invoice(invoice.id).await?;
        if !booked.is_empty() {
            let reason = format!("invoice {} voided", invoice.name);
            let reversals = booked
                .iter()
                .map(|row| row.reversal(&reason).for_invoice(invoice.id))
                .collect();
            self.port.record_journals(reversals).await?;
        }
        Ok(invoice)
    }

    /// Links an entry to the open invoice covering its start
    ///
    /// Pending invoices win over drafts. When no open invoice covers the
    /// entry, a rollover is attempted first. The entry's fee is recomputed
    /// and the entry saved in both success variants.
    ///
    /// # Errors
    ///
    /// `BillingError::EntryOutOfRange` if the entry starts outside the
    /// project's active window; the entry is not saved.
    pub async fn associate_entry(
        &self,
        entry: &mut Entry,
        project_id: ProjectId,
    ) -> Result<AssociationOutcome, BillingError> {
        let lock = self.project_lock(project_id).await;
        let _guard = lock.lock().await;

        let project = self.port.get_project(project_id).await?;
        if !project.is_active_at(entry.start) {
            return Err(BillingError::EntryOutOfRange {
                entry: entry.id,
                project: project.id,
                start: entry.start,
            });
        }

        let invoice_type = if entry.internal {
            InvoiceType::AccountsPayable
        } else {
            InvoiceType::AccountsReceivable
        };

        let mut candidates = self.eligible_invoices(&project, invoice_type, entry.start).await?;
        if candidates.is_empty() {
            self.rollover(&project, entry.start).await?;
            candidates = self.eligible_invoices(&project, invoice_type, entry.start).await?;
        }

        let chosen = candidates
            .iter()
            .find(|i| i.state == InvoiceState::Pending)
            .or_else(|| candidates.iter().rev().find(|i| i.state == InvoiceState::Draft));

        self.refresh_fee(entry).await?;
        let outcome = match chosen {
            Some(invoice) => {
                entry.link(invoice.id);
                AssociationOutcome::Associated { invoice_id: invoice.id }
            }
            None => {
                warn!(entry_id = %entry.id, project_id = %project.id, "No open invoice for entry");
                entry.mark_unaffiliated();
                AssociationOutcome::Unaffiliated
            }
        };
        self.port.save_entry(entry).await?;

        debug!(entry_id = %entry.id, outcome = ?outcome, "Entry associated");
        Ok(outcome)
    }

    /// Open invoices of a type whose period contains `at`, oldest first
    async fn eligible_invoices(
        &self,
        project: &Project,
        invoice_type: InvoiceType,
        at: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, BillingError> {
        let mut invoices: Vec<Invoice> = self
            .port
            .invoices_for_project(project.id)
            .await?
            .into_iter()
            .filter(|i| i.invoice_type == invoice_type && i.state.is_open() && i.period.contains(at))
            .collect();
        invoices.sort_by_key(|i| i.created_at);
        Ok(invoices)
    }

    async fn refresh_fee(&self, entry: &mut Entry) -> Result<(), BillingError> {
        let code = self.port.get_billing_code(entry.billing_code_id).await?;
        let rate = self.port.get_rate(code.rate_id).await?;
        entry.record_fee(fee_for(entry, &code, &rate));
        Ok(())
    }

    /// Re-runs association for every stored entry of a project
    ///
    /// Failures are logged and skipped; one bad entry does not stop the run.
    pub async fn backfill_project(&self, project_id: ProjectId) -> Result<BackfillSummary, BillingError> {
        let entries = self.port.entries_for_project(project_id).await?;
        let mut summary = BackfillSummary::default();

        for mut entry in entries {
            match self.associate_entry(&mut entry, project_id).await {
                Ok(AssociationOutcome::Associated { .. }) => summary.associated += 1,
                Ok(AssociationOutcome::Unaffiliated) => summary.unaffiliated += 1,
                Err(error) => {
                    warn!(entry_id = %entry.id, %error, "Backfill skipped entry");
                    summary.failed.push(entry.id);
                }
            }
        }

        info!(
            project_id = %project_id,
            associated = summary.associated,
            unaffiliated = summary.unaffiliated,
            failed = summary.failed.len(),
            "Backfill finished"
        );
        Ok(summary)
    }

    /// Whether the entry's billing code is over budget for its window
    ///
    /// Counts the billable hours of every non-void entry on the same code
    /// that starts inside the budget window.
    pub async fn check_budget(&self, entry: &Entry) -> Result<BudgetDecision, BillingError> {
        let code = self.port.get_billing_code(entry.billing_code_id).await?;
        let window = code.budget_window(entry.start)?;

        let billed: Decimal = self
            .port
            .entries_for_project(entry.project_id)
            .await?
            .iter()
            .filter(|e| e.billing_code_id == code.id && !e.is_void() && window.contains(e.start))
            .map(|e| code.billable_hours(e.minutes()))
            .sum();

        let decision = BudgetCheck::evaluate(&code, billed);
        if decision.warrants_alert() {
            warn!(billing_code = %code.code, billed_hours = %billed, "Billing code over budget");
        }
        Ok(decision)
    }
}
