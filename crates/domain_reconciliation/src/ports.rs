//! Journal source port
//!
//! The engine reads journal rows through this trait so it never depends on
//! how they are stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, PortError};
use domain_ledger::Journal;

#[async_trait]
pub trait JournalPort: DomainPort {
    /// Rows created in `[start, end]`, inclusive on both ends
    async fn journals_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Journal>, PortError>;

    /// Rows created at or before `as_of`
    async fn journals_up_to(&self, as_of: DateTime<Utc>) -> Result<Vec<Journal>, PortError>;

    /// Appends rows
    async fn record(&self, rows: Vec<Journal>) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory journal for tests and the diagnostic binary
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryJournalStore {
        rows: Arc<RwLock<Vec<Journal>>>,
    }

    impl InMemoryJournalStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_rows(rows: Vec<Journal>) -> Self {
            Self {
                rows: Arc::new(RwLock::new(rows)),
            }
        }

        pub async fn all(&self) -> Vec<Journal> {
            self.rows.read().await.clone()
        }
    }

    impl DomainPort for InMemoryJournalStore {}

    #[async_trait]
    impl JournalPort for InMemoryJournalStore {
        async fn journals_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Journal>, PortError> {
            let rows = self.rows.read().await;
            Ok(rows
                .iter()
                .filter(|r| r.created_at >= start && r.created_at <= end)
                .cloned()
                .collect())
        }

        async fn journals_up_to(&self, as_of: DateTime<Utc>) -> Result<Vec<Journal>, PortError> {
            let rows = self.rows.read().await;
            Ok(rows.iter().filter(|r| r.created_at <= as_of).cloned().collect())
        }

        async fn record(&self, rows: Vec<Journal>) -> Result<(), PortError> {
            let mut stored = self.rows.write().await;
            stored.extend(rows);
            Ok(())
        }
    }
}
