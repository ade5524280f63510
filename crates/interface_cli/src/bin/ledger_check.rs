//! Ledger consistency check
//!
//! Parses the plain-text ledger, lists the transactions that fail to
//! balance, and, when a journal export is configured, prints the combined
//! ledger size and the cash reconciliation report.
//!
//! # Usage
//!
//! ```bash
//! LEDGER_LEDGER_PATH=books/main.beancount ledger-check
//!
//! LEDGER_LEDGER_PATH=books/main.beancount \
//! LEDGER_JOURNALS_PATH=exports/journals.json \
//! LEDGER_AS_OF=2024-03-31 ledger-check
//! ```
//!
//! # Environment Variables
//!
//! * `LEDGER_LEDGER_PATH` - plain-text ledger (default: main.beancount)
//! * `LEDGER_JOURNALS_PATH` - JSON array of journal rows
//! * `LEDGER_AS_OF` - report date, `YYYY-MM-DD` (default: today)
//! * `LEDGER_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `LEDGER_LOG_JSON` - `true` for JSON log lines
//! * `LEDGER_RECONCILIATION__*` - matching windows and tolerance

use anyhow::Context;

use interface_cli::check::{render, run_check};
use interface_cli::config::AppConfig;
use interface_cli::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        ledger = %config.ledger_path.display(),
        journals = ?config.journals_path,
        as_of = %config.as_of_date(),
        "Starting ledger check"
    );

    let outcome = run_check(&config)
        .with_context(|| format!("checking {}", config.ledger_path.display()))?;
    render(&outcome, &mut std::io::stdout().lock())?;
    Ok(())
}
