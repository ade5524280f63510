//! Mapping of plain-text account names onto canonical account codes
//!
//! Rules are held in an ordered list. Exact rules are tried first in table
//! order, then prefix rules in table order, then a fallback on the
//! top-level category of the name. Overlapping prefixes therefore resolve
//! deterministically: the rule listed first wins.

use serde::{Deserialize, Serialize};

use crate::codes;

/// Top-level category of a plain-text account name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountCategory {
    Assets,
    Liabilities,
    Income,
    Equity,
    Expenses,
}

impl AccountCategory {
    /// Classifies a name by its leading category word
    ///
    /// Matching is a plain string prefix, so `AssetsX:Foo` still counts as
    /// an asset account.
    pub fn of(account: &str) -> Option<Self> {
        const PREFIXES: [(&str, AccountCategory); 5] = [
            ("Assets", AccountCategory::Assets),
            ("Liabilities", AccountCategory::Liabilities),
            ("Income", AccountCategory::Income),
            ("Equity", AccountCategory::Equity),
            ("Expenses", AccountCategory::Expenses),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| account.starts_with(prefix))
            .map(|(_, category)| *category)
    }

    /// Generic code used when no explicit rule matches
    pub fn fallback_code(&self) -> &'static str {
        match self {
            AccountCategory::Assets => codes::OTHER_ASSETS,
            AccountCategory::Liabilities => codes::OTHER_LIABILITIES,
            AccountCategory::Income => codes::OTHER_INCOME,
            AccountCategory::Equity => codes::EQUITY,
            AccountCategory::Expenses => codes::OTHER_EXPENSES,
        }
    }

    /// Whether a positive posting amount on this category is a credit
    ///
    /// Only income flips. Liabilities and equity take the asset/expense
    /// convention: a positive amount is a debit.
    pub fn positive_is_credit(&self) -> bool {
        matches!(self, AccountCategory::Income)
    }
}

/// How a rule matches an account name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulePattern {
    /// The whole name must be equal
    Exact(String),
    /// The name must start with this prefix
    Prefix(String),
}

/// One row of the mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRule {
    pub pattern: RulePattern,
    pub code: String,
}

impl AccountRule {
    /// Builds a rule from table notation: a trailing `*` marks a prefix rule
    pub fn parse(pattern: &str, code: impl Into<String>) -> Self {
        let pattern = match pattern.strip_suffix('*') {
            Some(prefix) => RulePattern::Prefix(prefix.to_string()),
            None => RulePattern::Exact(pattern.to_string()),
        };
        Self { pattern, code: code.into() }
    }
}

/// Ordered mapping table from plain-text account names to canonical codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMapper {
    rules: Vec<AccountRule>,
}

impl AccountMapper {
    pub fn new(rules: Vec<AccountRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[AccountRule] {
        &self.rules
    }

    /// Appends a rule at the lowest priority within its kind
    pub fn with_rule(mut self, pattern: &str, code: impl Into<String>) -> Self {
        self.rules.push(AccountRule::parse(pattern, code));
        self
    }

    /// Returns the canonical code for a plain-text account name
    pub fn map(&self, account: &str) -> &str {
        let exact = self.rules.iter().find(|rule| {
            matches!(&rule.pattern, RulePattern::Exact(name) if name == account)
        });
        if let Some(rule) = exact {
            return &rule.code;
        }

        let prefixed = self.rules.iter().find(|rule| {
            matches!(&rule.pattern, RulePattern::Prefix(prefix) if account.starts_with(prefix.as_str()))
        });
        if let Some(rule) = prefixed {
            return &rule.code;
        }

        AccountCategory::of(account)
            .map(|category| category.fallback_code())
            .unwrap_or(codes::UNCLASSIFIED)
    }
}

impl Default for AccountMapper {
    fn default() -> Self {
        let table: [(&str, &str); 19] = [
            ("Assets:Checking:ChaseBusiness", codes::CASH),
            ("Assets:Equipment:Hardware", codes::EQUIPMENT),
            ("Assets:Ownership:AvailableEquityPool", codes::EQUITY_POOL),
            ("Liabilities:CreditCard:ChaseCredit", codes::CREDIT_CARD_PAYABLE),
            ("Income:ClientBillables:*", codes::REVENUE),
            ("Income:ACHVerification:*", codes::REVENUE),
            ("Equity:Ownership:*", codes::EQUITY_OWNERSHIP),
            ("Equity:CompanyFormation", codes::EQUITY_OWNERSHIP),
            ("Expenses:Distributions:*", codes::OWNER_DISTRIBUTIONS),
            ("Expenses:Payroll:*", codes::PAYROLL_EXPENSE),
            ("Expenses:Equipment:Hardware", codes::EQUIPMENT_EXPENSE),
            ("Expenses:Fees:*", codes::OPERATING_EXPENSES_FEES),
            ("Expenses:Legal:*", codes::OPERATING_EXPENSES_LEGAL),
            ("Expenses:SaaS:*", codes::OPERATING_EXPENSES_SAAS),
            ("Expenses:Travel:*", codes::OPERATING_EXPENSES_TRAVEL),
            ("Expenses:Discretionary:*", codes::OPERATING_EXPENSES_DISCRETIONARY),
            ("Expenses:Taxes:*", codes::OPERATING_EXPENSES_TAXES),
            ("Expenses:Vendors:*", codes::OPERATING_EXPENSES_VENDORS),
            ("Expenses:Office:*", codes::OPERATING_EXPENSES_OFFICE),
        ];

        Self::new(
            table
                .iter()
                .map(|(pattern, code)| AccountRule::parse(pattern, *code))
                .collect(),
        )
    }
}

/// Human-readable label for an account: the 3rd segment, else the 2nd
///
/// Empty segments (from doubled colons) are skipped.
///
/// ```rust,ignore
/// assert_eq!(sub_account("Income:ClientBillables:Vanta"), "Vanta");
/// assert_eq!(sub_account("Equity:CompanyFormation"), "CompanyFormation");
/// ```
pub fn sub_account(account: &str) -> String {
    let parts: Vec<&str> = account.split(':').filter(|s| !s.is_empty()).collect();
    parts
        .get(2)
        .or_else(|| parts.get(1))
        .map(|s| s.to_string())
        .unwrap_or_default()
}
