//! Persistence port for the billing lifecycle
//!
//! The state machine only talks to storage through `BillingPort`. Adapters
//! decide how rows are stored; the service decides what changes.

use async_trait::async_trait;

use core_kernel::{BillingCodeId, DomainPort, EntryId, InvoiceId, PortError, ProjectId, RateId};
use domain_ledger::Journal;

use crate::billing_code::{BillingCode, Rate};
use crate::entry::Entry;
use crate::invoice::{Adjustment, Invoice};
use crate::project::Project;

#[async_trait]
pub trait BillingPort: DomainPort {
    async fn get_project(&self, id: ProjectId) -> Result<Project, PortError>;

    async fn get_billing_code(&self, id: BillingCodeId) -> Result<BillingCode, PortError>;

    async fn get_rate(&self, id: RateId) -> Result<Rate, PortError>;

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError>;

    /// Every invoice of the project, any type and state
    async fn invoices_for_project(&self, project_id: ProjectId) -> Result<Vec<Invoice>, PortError>;

    /// Inserts or replaces an invoice
    async fn save_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;

    async fn get_entry(&self, id: EntryId) -> Result<Entry, PortError>;

    async fn entries_for_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Entry>, PortError>;

    async fn entries_for_project(&self, project_id: ProjectId) -> Result<Vec<Entry>, PortError>;

    /// Inserts or replaces an entry
    async fn save_entry(&self, entry: &Entry) -> Result<(), PortError>;

    async fn adjustments_for_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Adjustment>, PortError>;

    async fn record_journals(&self, rows: Vec<Journal>) -> Result<(), PortError>;

    async fn journals_for_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Journal>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Tables {
        projects: HashMap<ProjectId, Project>,
        billing_codes: HashMap<BillingCodeId, BillingCode>,
        rates: HashMap<RateId, Rate>,
        invoices: HashMap<InvoiceId, Invoice>,
        entries: HashMap<EntryId, Entry>,
        adjustments: Vec<Adjustment>,
        journals: Vec<Journal>,
    }

    /// In-memory billing store
    ///
    /// All tables sit behind one lock, so each call observes and mutates a
    /// consistent snapshot.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryBillingStore {
        tables: Arc<RwLock<Tables>>,
    }

    impl InMemoryBillingStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn insert_project(&self, project: Project) {
            self.tables.write().await.projects.insert(project.id, project);
        }

        pub async fn insert_billing_code(&self, code: BillingCode) {
            self.tables.write().await.billing_codes.insert(code.id, code);
        }

        pub async fn insert_rate(&self, rate: Rate) {
            self.tables.write().await.rates.insert(rate.id, rate);
        }

        pub async fn insert_adjustment(&self, adjustment: Adjustment) {
            self.tables.write().await.adjustments.push(adjustment);
        }

        pub async fn journals(&self) -> Vec<Journal> {
            self.tables.read().await.journals.clone()
        }

        pub async fn invoice_count(&self) -> usize {
            self.tables.read().await.invoices.len()
        }
    }

    impl DomainPort for InMemoryBillingStore {}

    fn found<T: Clone>(value: Option<&T>, entity_type: &str, id: impl std::fmt::Display) -> Result<T, PortError> {
        value.cloned().ok_or_else(|| PortError::not_found(entity_type, id))
    }

    #[async_trait]
    impl BillingPort for InMemoryBillingStore {
        async fn get_project(&self, id: ProjectId) -> Result<Project, PortError> {
            found(self.tables.read().await.projects.get(&id), "Project", id)
        }

        async fn get_billing_code(&self, id: BillingCodeId) -> Result<BillingCode, PortError> {
            found(self.tables.read().await.billing_codes.get(&id), "BillingCode", id)
        }

        async fn get_rate(&self, id: RateId) -> Result<Rate, PortError> {
            found(self.tables.read().await.rates.get(&id), "Rate", id)
        }

        async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
            found(self.tables.read().await.invoices.get(&id), "Invoice", id)
        }

        async fn invoices_for_project(&self, project_id: ProjectId) -> Result<Vec<Invoice>, PortError> {
            let tables = self.tables.read().await;
            let mut invoices: Vec<Invoice> = tables
                .invoices
                .values()
                .filter(|i| i.project_id == project_id)
                .cloned()
                .collect();
            invoices.sort_by_key(|i| (i.created_at, i.id));
            Ok(invoices)
        }

        async fn save_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
            self.tables.write().await.invoices.insert(invoice.id, invoice.clone());
            Ok(())
        }

        async fn get_entry(&self, id: EntryId) -> Result<Entry, PortError> {
            found(self.tables.read().await.entries.get(&id), "Entry", id)
        }

        async fn entries_for_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Entry>, PortError> {
            let tables = self.tables.read().await;
            let mut entries: Vec<Entry> = tables
                .entries
                .values()
                .filter(|e| e.invoice_id == Some(invoice_id))
                .cloned()
                .collect();
            entries.sort_by_key(|e| (e.start, e.id));
            Ok(entries)
        }

        async fn entries_for_project(&self, project_id: ProjectId) -> Result<Vec<Entry>, PortError> {
            let tables = self.tables.read().await;
            let mut entries: Vec<Entry> = tables
                .entries
                .values()
                .filter(|e| e.project_id == project_id)
                .cloned()
                .collect();
            entries.sort_by_key(|e| (e.start, e.id));
            Ok(entries)
        }

        async fn save_entry(&self, entry: &Entry) -> Result<(), PortError> {
            self.tables.write().await.entries.insert(entry.id, entry.clone());
            Ok(())
        }

        async fn adjustments_for_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Adjustment>, PortError> {
            let tables = self.tables.read().await;
            Ok(tables
                .adjustments
                .iter()
                .filter(|a| a.invoice_id == invoice_id)
                .cloned()
                .collect())
        }

        async fn record_journals(&self, rows: Vec<Journal>) -> Result<(), PortError> {
            self.tables.write().await.journals.extend(rows);
            Ok(())
        }

        async fn journals_for_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Journal>, PortError> {
            let tables = self.tables.read().await;
            Ok(tables
                .journals
                .iter()
                .filter(|j| j.invoice_id == Some(invoice_id))
                .cloned()
                .collect())
        }
    }
}
