//! Posting balancing and validation
//!
//! A transaction may omit the amount on exactly one posting; that amount
//! is inferred as the negated sum of the others. Validation then checks the
//! postings net to zero within `BALANCE_TOLERANCE`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::BalanceError;
use crate::transaction::{BeancountTransaction, Ledger};

/// Largest residual a transaction may carry and still count as balanced
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

impl BeancountTransaction {
    /// Fills in the single posting that omits its amount
    ///
    /// A posting with an amount of exactly zero is treated as omitted. With
    /// no such posting the transaction is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::MultipleInferredAmounts` when two or more
    /// postings omit their amount. The transaction is not modified.
    pub fn balance_postings(&mut self) -> Result<(), BalanceError> {
        let mut total = Decimal::ZERO;
        let mut inferred: Option<usize> = None;

        for (idx, posting) in self.postings.iter().enumerate() {
            if posting.amount.is_zero() {
                if inferred.is_some() {
                    return Err(BalanceError::MultipleInferredAmounts { line: self.line });
                }
                inferred = Some(idx);
            } else {
                total += posting.amount;
            }
        }

        if let Some(idx) = inferred {
            self.postings[idx].amount = -total;
        }

        Ok(())
    }

    /// Sum of all posting amounts as they currently stand
    pub fn posting_sum(&self) -> Decimal {
        self.postings.iter().map(|p| p.amount).sum()
    }

    /// Checks that the transaction balances once its omitted amount is inferred
    ///
    /// Works on a copy; `self` is not modified.
    pub fn validate(&self) -> Result<(), BalanceError> {
        let mut balanced = self.clone();
        balanced.balance_postings()?;

        let sum = balanced.posting_sum();
        if sum.abs() > BALANCE_TOLERANCE {
            return Err(BalanceError::Unbalanced { sum, line: self.line });
        }
        Ok(())
    }
}

impl Ledger {
    /// Validates every transaction and collects all failures
    ///
    /// One bad transaction never hides another: the result lists every
    /// failure in file order.
    pub fn validate_all(&self) -> Vec<BalanceError> {
        self.transactions
            .iter()
            .filter_map(|tx| tx.validate().err())
            .collect()
    }

    /// Infers omitted amounts in place for every transaction
    ///
    /// Transactions that cannot be balanced are left as parsed and their
    /// errors returned, so that conversion to entries can still proceed.
    pub fn balance_all(&mut self) -> Vec<BalanceError> {
        self.transactions
            .iter_mut()
            .filter_map(|tx| tx.balance_postings().err())
            .collect()
    }
}
