//! Keyword rule table for plain-text CASH entries
//!
//! Bank descriptions are free text. Each rule lists lower-case substrings;
//! the first rule whose keyword appears in the description (and whose
//! condition holds) decides what the entry represents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a classified CASH movement is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashDisposition {
    CreditCardPayment,
    BankFee,
    ClientPayment,
    Payroll,
    OwnerTransfer,
}

impl CashDisposition {
    /// Whether an entry of this kind survives deduplication
    ///
    /// Card payments and bank fees exist only in the plain-text ledger.
    /// Client receipts, payroll and owner transfers are booked by the journal.
    pub fn keeps(&self) -> bool {
        matches!(self, CashDisposition::CreditCardPayment | CashDisposition::BankFee)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CashDisposition::CreditCardPayment => "credit_card_payment",
            CashDisposition::BankFee => "bank_fee",
            CashDisposition::ClientPayment => "client_payment",
            CashDisposition::Payroll => "payroll",
            CashDisposition::OwnerTransfer => "owner_transfer",
        }
    }
}

/// Extra requirement a keyword hit must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleCondition {
    Always,
    /// Debit must be positive and the description must contain none of these
    DebitExcluding(Vec<String>),
}

impl RuleCondition {
    fn holds(&self, description: &str, debit: Decimal) -> bool {
        match self {
            RuleCondition::Always => true,
            RuleCondition::DebitExcluding(excluded) => {
                debit > Decimal::ZERO && !excluded.iter().any(|k| description.contains(k.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub disposition: CashDisposition,
    /// Lower-case substrings
    pub keywords: Vec<String>,
    pub condition: RuleCondition,
}

impl KeywordRule {
    pub fn new(disposition: CashDisposition, keywords: &[&str]) -> Self {
        Self {
            disposition,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            condition: RuleCondition::Always,
        }
    }

    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.condition = condition;
        self
    }

    /// `description` must already be lower-cased
    fn matches(&self, description: &str, debit: Decimal) -> bool {
        self.keywords.iter().any(|k| description.contains(k.as_str()))
            && self.condition.holds(description, debit)
    }
}

/// Ordered rule list; earlier rules win
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRules {
    rules: Vec<KeywordRule>,
}

impl KeywordRules {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Appends a rule after the existing ones
    pub fn with_rule(mut self, rule: KeywordRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Classifies a CASH description, case-insensitively
    pub fn classify(&self, description: &str, debit: Decimal) -> Option<CashDisposition> {
        let description = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&description, debit))
            .map(|rule| rule.disposition)
    }
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(
                CashDisposition::CreditCardPayment,
                &["payment to chase card", "chase credit", "card payment", "cc payment"],
            ),
            KeywordRule::new(
                CashDisposition::BankFee,
                &["ach pmnts initial fee", "low value fee", "standard ach", "rtp/same day"],
            ),
            KeywordRule::new(
                CashDisposition::ClientPayment,
                &["grid - grid retainer", "twillory parabola", "haberdash"],
            ),
            KeywordRule::new(CashDisposition::ClientPayment, &["orig co name:"]).with_condition(
                RuleCondition::DebitExcluding(vec!["gusto".to_string(), "wcg cpas".to_string()]),
            ),
            KeywordRule::new(
                CashDisposition::Payroll,
                &["basic online payroll payment", "payroll payment", "gusto payroll"],
            ),
            KeywordRule::new(
                CashDisposition::OwnerTransfer,
                &["online transfer to sav", "transfer to savings", "owner draw"],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_card_payment_is_kept() {
        let rules = KeywordRules::default();
        let disposition = rules.classify("Payment to Chase Card ending 1234", dec!(0)).unwrap();
        assert_eq!(disposition, CashDisposition::CreditCardPayment);
        assert!(disposition.keeps());
    }

    #[test]
    fn test_bank_fee_is_kept() {
        let rules = KeywordRules::default();
        assert_eq!(rules.classify("LOW VALUE FEE", dec!(0)), Some(CashDisposition::BankFee));
    }

    #[test]
    fn test_orig_co_name_deposit_is_client_payment() {
        let rules = KeywordRules::default();
        assert_eq!(
            rules.classify("ORIG CO NAME: ACME CORP", dec!(5000)),
            Some(CashDisposition::ClientPayment)
        );
    }

    #[test]
    fn test_orig_co_name_needs_debit_and_no_payroll_vendor() {
        let rules = KeywordRules::default();
        assert_eq!(rules.classify("orig co name: acme corp", dec!(0)), None);
        assert_eq!(rules.classify("orig co name: wcg cpas", dec!(300)), None);
        assert_eq!(
            rules.classify("orig co name: gusto payroll", dec!(300)),
            Some(CashDisposition::Payroll)
        );
    }

    #[test]
    fn test_earlier_rule_wins() {
        let rules = KeywordRules::default();
        assert_eq!(
            rules.classify("card payment via owner draw", dec!(0)),
            Some(CashDisposition::CreditCardPayment)
        );
    }

    #[test]
    fn test_custom_rule_appended() {
        let rules = KeywordRules::default()
            .with_rule(KeywordRule::new(CashDisposition::ClientPayment, &["Wire From Vanta"]));
        assert_eq!(
            rules.classify("wire from vanta inc", dec!(100)),
            Some(CashDisposition::ClientPayment)
        );
        assert_eq!(rules.classify("coffee", dec!(4)), None);
    }
}
