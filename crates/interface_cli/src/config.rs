//! Application configuration
//!
//! Read from `LEDGER_`-prefixed environment variables. Nested reconciliation
//! settings use a double underscore, e.g.
//! `LEDGER_RECONCILIATION__CASH_MATCH_WINDOW_DAYS=5`.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use domain_reconciliation::ReconciliationConfig;

pub const ENV_PREFIX: &str = "LEDGER";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Plain-text ledger file
    pub ledger_path: PathBuf,
    /// JSON array of journal rows; reconciliation is skipped without it
    pub journals_path: Option<PathBuf>,
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Report date; today when unset
    pub as_of: Option<NaiveDate>,
    pub reconciliation: ReconciliationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("main.beancount"),
            journals_path: None,
            log_level: "info".to_string(),
            log_json: false,
            as_of: None,
            reconciliation: ReconciliationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds the configuration from an environment source
    ///
    /// Tests pass an explicit variable map through
    /// `config::Environment::source`.
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.prefix_separator("_").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// The configured report date, or today
    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}
