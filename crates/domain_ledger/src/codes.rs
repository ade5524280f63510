//! Canonical general-ledger account codes
//!
//! Both ledger sources are normalised onto these codes. Journal rows are
//! written with them directly; plain-text account names reach them through
//! the `AccountMapper`.

// Assets
pub const CASH: &str = "CASH";
pub const ACCRUED_RECEIVABLES: &str = "ACCRUED_RECEIVABLES";
pub const ACCOUNTS_RECEIVABLE: &str = "ACCOUNTS_RECEIVABLE";
pub const EQUIPMENT: &str = "EQUIPMENT";
pub const EQUITY_POOL: &str = "EQUITY_POOL";
pub const OTHER_ASSETS: &str = "OTHER_ASSETS";

// Liabilities
pub const ACCRUED_PAYROLL: &str = "ACCRUED_PAYROLL";
pub const ACCOUNTS_PAYABLE: &str = "ACCOUNTS_PAYABLE";
pub const ACCRUED_EXPENSES_PAYABLE: &str = "ACCRUED_EXPENSES_PAYABLE";
pub const CREDIT_CARD_PAYABLE: &str = "CREDIT_CARD_PAYABLE";
pub const OTHER_LIABILITIES: &str = "OTHER_LIABILITIES";

// Income
pub const REVENUE: &str = "REVENUE";
pub const ADJUSTMENT_REVENUE: &str = "ADJUSTMENT_REVENUE";
pub const OTHER_INCOME: &str = "OTHER_INCOME";

// Contra revenue
pub const CREDITS_ISSUED: &str = "CREDITS_ISSUED";
pub const DISCOUNTS: &str = "DISCOUNTS";

// Equity
pub const EQUITY_OWNERSHIP: &str = "EQUITY_OWNERSHIP";
pub const EQUITY: &str = "EQUITY";

// Expenses
pub const PAYROLL_EXPENSE: &str = "PAYROLL_EXPENSE";
pub const ADJUSTMENT_EXPENSE: &str = "ADJUSTMENT_EXPENSE";
pub const OWNER_DISTRIBUTIONS: &str = "OWNER_DISTRIBUTIONS";
pub const EQUIPMENT_EXPENSE: &str = "EQUIPMENT_EXPENSE";
pub const OPERATING_EXPENSES_FEES: &str = "OPERATING_EXPENSES_FEES";
pub const OPERATING_EXPENSES_LEGAL: &str = "OPERATING_EXPENSES_LEGAL";
pub const OPERATING_EXPENSES_SAAS: &str = "OPERATING_EXPENSES_SAAS";
pub const OPERATING_EXPENSES_TRAVEL: &str = "OPERATING_EXPENSES_TRAVEL";
pub const OPERATING_EXPENSES_DISCRETIONARY: &str = "OPERATING_EXPENSES_DISCRETIONARY";
pub const OPERATING_EXPENSES_TAXES: &str = "OPERATING_EXPENSES_TAXES";
pub const OPERATING_EXPENSES_VENDORS: &str = "OPERATING_EXPENSES_VENDORS";
pub const OPERATING_EXPENSES_OFFICE: &str = "OPERATING_EXPENSES_OFFICE";
pub const OTHER_EXPENSES: &str = "OTHER_EXPENSES";

pub const UNCLASSIFIED: &str = "UNCLASSIFIED";
