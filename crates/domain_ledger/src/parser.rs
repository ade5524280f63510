//! Line-oriented parser for the plain-text ledger format
//!
//! The parser is permissive: it recognises transaction headers, indented
//! posting lines and a handful of directives, and silently skips any other
//! line. It is strict about the tokens it does interpret, and aborts on the
//! first malformed date, amount or directive.
//!
//! ```text
//! 2024-01-15 * "Acme" "Consulting" #proj
//!   Assets:Checking:ChaseBusiness  -100.00 USD
//!   Expenses:Vendors:Acme
//! 2024-01-01 open Assets:Checking:ChaseBusiness USD
//! 2024-02-01 balance Assets:Checking:ChaseBusiness 1,250.00 USD
//! ```

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::transaction::{
    BeancountAccount, BeancountBalance, BeancountPosting, BeancountTransaction, Ledger,
    TransactionFlag, DEFAULT_CURRENCY,
};

// The patterns below are literals; compilation cannot fail.
static TRANSACTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\s+[*!]").expect("header pattern is valid"));
static DATED_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}\s+(open|balance|close|commodity)(\s|$)")
        .expect("directive pattern is valid")
});
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("quote pattern is valid"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("tag pattern is valid"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses ledger text into a `Ledger`
///
/// A header with two quoted strings reads as payee then narration, and the
/// narration becomes the description. Older tooling for this format kept the
/// first string as the description instead, so `"Acme" "Consulting"` used to
/// read as `Acme`.
///
/// # Errors
///
/// Returns the first `ParseError`, tagged with its 1-based line number.
pub fn parse(input: &str) -> Result<Ledger, ParseError> {
    let mut ledger = Ledger::default();
    let mut current: Option<BeancountTransaction> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }

        if is_indented(raw) {
            if let Some(tx) = current.as_mut() {
                if let Some(posting) = parse_posting(trimmed, line_no)? {
                    tx.postings.push(posting);
                }
            }
            continue;
        }

        // Any unindented line ends the open transaction.
        if let Some(tx) = current.take() {
            ledger.transactions.push(tx);
        }

        if TRANSACTION_HEADER.is_match(trimmed) {
            current = Some(parse_header(trimmed, line_no)?);
            continue;
        }

        let directive = directive_keyword(trimmed);
        match directive {
            Some("open") => ledger.accounts.push(parse_open(trimmed, line_no)?),
            Some("balance") => ledger.balances.push(parse_balance(trimmed, line_no)?),
            _ => {}
        }
    }

    if let Some(tx) = current.take() {
        ledger.transactions.push(tx);
    }

    Ok(ledger)
}

fn is_indented(raw: &str) -> bool {
    raw.starts_with("  ") || raw.starts_with('\t')
}

/// Returns the directive keyword of a dated or bare directive line
fn directive_keyword(trimmed: &str) -> Option<&str> {
    if let Some(caps) = DATED_DIRECTIVE.captures(trimmed) {
        return caps.get(1).map(|m| m.as_str());
    }
    let first = trimmed.split_whitespace().next()?;
    match first {
        "open" | "balance" | "close" | "commodity" | "option" => Some(first),
        _ => None,
    }
}

fn parse_date(token: &str, line: usize) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .map_err(|_| ParseError::new(line, ParseErrorKind::InvalidDate(token.to_string())))
}

fn parse_amount(token: &str, line: usize) -> Result<Decimal, ParseError> {
    let cleaned = token.replace(',', "");
    Decimal::from_str(&cleaned)
        .map_err(|_| ParseError::new(line, ParseErrorKind::InvalidAmount(token.to_string())))
}

fn parse_header(line: &str, line_no: usize) -> Result<BeancountTransaction, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let date = parse_date(parts[0], line_no)?;
    // The header pattern guarantees a second token starting with the flag.
    let flag = parts
        .get(1)
        .and_then(|t| t.chars().next())
        .and_then(TransactionFlag::from_char)
        .unwrap_or(TransactionFlag::Cleared);

    let rest = if parts.len() > 2 { parts[2..].join(" ") } else { String::new() };

    // One quoted string is the narration; with two, the first is the payee.
    let mut quoted: Vec<String> = QUOTED
        .captures_iter(&rest)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .take(2)
        .collect();
    let (payee, description) = match quoted.len() {
        2 => {
            let narration = quoted.pop().unwrap_or_default();
            (quoted.pop(), narration)
        }
        _ => (None, quoted.pop().unwrap_or_default()),
    };

    let tags = TAG
        .captures_iter(&rest)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok(BeancountTransaction {
        date,
        flag,
        payee,
        description,
        tags,
        postings: Vec::new(),
        line: line_no,
    })
}

fn parse_posting(line: &str, line_no: usize) -> Result<Option<BeancountPosting>, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(account) = parts.first() else {
        return Ok(None);
    };

    let amount = match parts.get(1) {
        Some(token) => parse_amount(token, line_no)?,
        None => Decimal::ZERO,
    };
    let currency = parts.get(2).copied().unwrap_or(DEFAULT_CURRENCY);

    Ok(Some(BeancountPosting::new(*account, amount).with_currency(currency)))
}

fn parse_open(line: &str, line_no: usize) -> Result<BeancountAccount, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::new(
            line_no,
            ParseErrorKind::MalformedDirective { directive: "open", expected: 3, found: parts.len() },
        ));
    }

    Ok(BeancountAccount {
        date: parse_date(parts[0], line_no)?,
        name: parts[2].to_string(),
        line: line_no,
    })
}

fn parse_balance(line: &str, line_no: usize) -> Result<BeancountBalance, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(ParseError::new(
            line_no,
            ParseErrorKind::MalformedDirective { directive: "balance", expected: 5, found: parts.len() },
        ));
    }

    Ok(BeancountBalance {
        date: parse_date(parts[0], line_no)?,
        account: parts[2].to_string(),
        amount: parse_amount(parts[3], line_no)?,
        currency: parts[4].to_string(),
        line: line_no,
    })
}
