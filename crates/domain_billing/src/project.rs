//! Projects and their billing windows

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Period, ProjectId, TemporalError};

/// How often a project's work is invoiced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    /// One invoice per calendar month
    #[default]
    Monthly,
    /// One invoice covering the whole active window
    Project,
}

/// A unit of client work with an active window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Half-open window in which time may be billed
    pub active: Period,
    pub billing_frequency: BillingFrequency,
    /// Internal projects are never billed to a client
    pub internal: bool,
    pub budget_hours: Option<Decimal>,
}

impl Project {
    pub fn new(name: impl Into<String>, active: Period) -> Self {
        Self {
            id: ProjectId::new_v7(),
            name: name.into(),
            active,
            billing_frequency: BillingFrequency::Monthly,
            internal: false,
            budget_hours: None,
        }
    }

    pub fn with_billing_frequency(mut self, frequency: BillingFrequency) -> Self {
        self.billing_frequency = frequency;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.active.contains(at)
    }

    /// Billing period an invoice created at `at` should cover
    pub fn billing_period(&self, at: DateTime<Utc>) -> Result<Period, TemporalError> {
        match self.billing_frequency {
            BillingFrequency::Monthly => Period::month_containing(at),
            BillingFrequency::Project => Ok(self.active),
        }
    }
}
