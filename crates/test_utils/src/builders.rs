//! Test Data Builders
//!
//! Builders with sensible defaults, so tests only spell out the fields
//! they care about.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use core_kernel::{BillingCodeId, EmployeeId, InvoiceId, Money, Period, ProjectId};
use domain_billing::ports::mock::InMemoryBillingStore;
use domain_billing::{BillingCode, BillingFrequency, BudgetPeriod, Entry, Project, Rate};
use domain_ledger::Journal;
use rust_decimal::Decimal;

use crate::fixtures::{MoneyFixtures, TemporalFixtures};

/// Builder for journal rows
pub struct JournalBuilder {
    account: String,
    sub_account: String,
    memo: String,
    debit: i64,
    credit: i64,
    created_at: DateTime<Utc>,
    invoice_id: Option<InvoiceId>,
}

impl JournalBuilder {
    pub fn debit(account: impl Into<String>, minor: i64) -> Self {
        Self::new(account, minor, 0)
    }

    pub fn credit(account: impl Into<String>, minor: i64) -> Self {
        Self::new(account, 0, minor)
    }

    fn new(account: impl Into<String>, debit: i64, credit: i64) -> Self {
        Self {
            account: account.into(),
            sub_account: String::new(),
            memo: String::new(),
            debit,
            credit,
            created_at: TemporalFixtures::march_workday(1),
            invoice_id: None,
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn sub_account(mut self, sub_account: impl Into<String>) -> Self {
        self.sub_account = sub_account.into();
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn invoice(mut self, invoice_id: InvoiceId) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    pub fn build(self) -> Journal {
        let mut row = Journal::debit(self.account, self.debit, self.created_at)
            .with_sub_account(self.sub_account)
            .with_memo(self.memo);
        row.credit = self.credit;
        if let Some(invoice_id) = self.invoice_id {
            row = row.for_invoice(invoice_id);
        }
        row
    }
}

/// Builder for projects
pub struct ProjectBuilder {
    name: String,
    active: Period,
    frequency: BillingFrequency,
    internal: bool,
    budget_hours: Option<Decimal>,
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            name: "Vanta".to_string(),
            active: TemporalFixtures::project_window(),
            frequency: BillingFrequency::Monthly,
            internal: false,
            budget_hours: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn active(mut self, active: Period) -> Self {
        self.active = active;
        self
    }

    pub fn billed_per_project(mut self) -> Self {
        self.frequency = BillingFrequency::Project;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn budget_hours(mut self, hours: Decimal) -> Self {
        self.budget_hours = Some(hours);
        self
    }

    pub fn build(self) -> Project {
        let mut project = Project::new(self.name, self.active).with_billing_frequency(self.frequency);
        project.internal = self.internal;
        project.budget_hours = self.budget_hours;
        project
    }
}

/// Builder for a billing code together with its external rate
pub struct BillingCodeBuilder {
    project_id: ProjectId,
    code: String,
    rate: Money,
    internal_rate: Option<Money>,
    rounded_to_minutes: Option<u32>,
    budget: Option<(Decimal, BudgetPeriod)>,
    active: Period,
}

impl BillingCodeBuilder {
    pub fn for_project(project: &Project) -> Self {
        Self {
            project_id: project.id,
            code: format!("{}-ENG", project.name.to_uppercase()),
            rate: MoneyFixtures::hourly_rate(),
            internal_rate: None,
            rounded_to_minutes: None,
            budget: None,
            active: project.active,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn rate(mut self, rate: Money) -> Self {
        self.rate = rate;
        self
    }

    pub fn internal_rate(mut self, rate: Money) -> Self {
        self.internal_rate = Some(rate);
        self
    }

    pub fn rounded_to(mut self, minutes: u32) -> Self {
        self.rounded_to_minutes = Some(minutes);
        self
    }

    pub fn budget(mut self, hours: Decimal, period: BudgetPeriod) -> Self {
        self.budget = Some((hours, period));
        self
    }

    /// Returns the code, its rate, and the internal rate when one was set
    pub fn build(self) -> (BillingCode, Rate, Option<Rate>) {
        let rate = Rate::new(format!("{} standard", self.code), self.rate);
        let internal = self
            .internal_rate
            .map(|amount| Rate::new(format!("{} internal", self.code), amount).internal_only());

        let mut code = BillingCode::new(self.project_id, self.code, rate.id, self.active);
        if let Some(internal) = &internal {
            code = code.with_internal_rate(internal.id);
        }
        if let Some(minutes) = self.rounded_to_minutes {
            code = code.rounded_to(minutes);
        }
        if let Some((hours, period)) = self.budget {
            code = code.with_budget(hours, period);
        }
        (code, rate, internal)
    }
}

/// Builder for time entries
pub struct EntryBuilder {
    project_id: ProjectId,
    billing_code_id: BillingCodeId,
    employee_id: EmployeeId,
    start: DateTime<Utc>,
    minutes: i64,
    internal: bool,
    notes: String,
}

impl EntryBuilder {
    pub fn on(project: &Project, code: &BillingCode) -> Self {
        Self {
            project_id: project.id,
            billing_code_id: code.id,
            employee_id: EmployeeId::new(),
            start: TemporalFixtures::march_workday(4),
            minutes: 60,
            internal: false,
            notes: String::new(),
        }
    }

    pub fn starting(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn by(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = employee_id;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn build(self) -> Entry {
        let mut entry = Entry::new(
            self.project_id,
            self.employee_id,
            self.billing_code_id,
            self.start,
            self.start + Duration::minutes(self.minutes),
        )
        .with_notes(self.notes);
        if self.internal {
            entry = entry.internal();
        }
        entry
    }
}

/// An in-memory billing store holding one project and its billing code
pub async fn seeded_billing_store(
    project: &Project,
    code: &BillingCode,
    rates: impl IntoIterator<Item = Rate>,
) -> Arc<InMemoryBillingStore> {
    let store = Arc::new(InMemoryBillingStore::new());
    store.insert_project(project.clone()).await;
    store.insert_billing_code(code.clone()).await;
    for rate in rates {
        store.insert_rate(rate).await;
    }
    store
}
