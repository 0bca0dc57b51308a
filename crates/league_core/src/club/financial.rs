//! Club ledger.
//!
//! The balance is never stored: it is the sum of all accepted transactions,
//! and a charge larger than the balance is refused.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub value: i64,
    pub comment: String,
}

impl Transaction {
    pub fn new(value: i64, comment: impl Into<String>) -> Self {
        Self { value, comment: comment.into() }
    }
}

/// Append-only transaction ledger with a non-negative balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialAccount {
    transactions: Vec<Transaction>,
}

impl FinancialAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> i64 {
        self.transactions.iter().map(|t| t.value).sum()
    }

    /// Appends the transaction unless it would make the balance negative.
    ///
    /// Returns `false` (and leaves the ledger untouched) on refusal.
    #[must_use]
    pub fn process_transaction(&mut self, transaction: Transaction) -> bool {
        if transaction.value < 0 && transaction.value.abs() > self.balance() {
            return false;
        }
        self.transactions.push(transaction);
        true
    }

    /// Appends an initial seed or explicit adjustment without the overdraft
    /// check. The balance may go negative; later charges are refused until
    /// income brings it back.
    pub fn apply_adjustment(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// The `n` most recent transactions, oldest first.
    pub fn latest_transactions(&self, n: usize) -> &[Transaction] {
        let start = self.transactions.len().saturating_sub(n);
        &self.transactions[start..]
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Collapses the history into a single entry carrying the balance.
    pub fn merge_transactions(&mut self, comment: impl Into<String>) {
        let merged = Transaction::new(self.balance(), comment);
        self.transactions = vec![merged];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded(amount: i64) -> FinancialAccount {
        let mut account = FinancialAccount::new();
        assert!(account.process_transaction(Transaction::new(amount, "Initial balance")));
        account
    }

    #[test]
    fn test_overdraft_is_refused() {
        let mut account = funded(100);
        assert!(!account.process_transaction(Transaction::new(-101, "Too much")));
        assert_eq!(account.balance(), 100);
        assert_eq!(account.transactions().len(), 1);

        assert!(account.process_transaction(Transaction::new(-100, "Everything")));
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn test_latest_transactions() {
        let mut account = funded(10);
        for i in 1..=5 {
            assert!(account.process_transaction(Transaction::new(i, format!("#{}", i))));
        }
        let latest = account.latest_transactions(2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].value, 4);
        assert_eq!(latest[1].value, 5);
        assert_eq!(account.latest_transactions(100).len(), 6);
        assert!(account.latest_transactions(0).is_empty());
    }

    #[test]
    fn test_merge_keeps_balance() {
        let mut account = funded(1000);
        assert!(account.process_transaction(Transaction::new(-300, "Rent")));
        assert!(account.process_transaction(Transaction::new(50, "Tickets")));
        account.merge_transactions("Carried over");

        assert_eq!(account.transactions().len(), 1);
        assert_eq!(account.balance(), 750);
        assert_eq!(account.transactions()[0].comment, "Carried over");
    }

    #[test]
    fn test_adjustment_bypasses_overdraft_check() {
        let mut account = FinancialAccount::new();
        account.apply_adjustment(Transaction::new(-200, "Debt"));
        assert_eq!(account.balance(), -200);

        assert!(!account.process_transaction(Transaction::new(-1, "Rent")));
        assert!(account.process_transaction(Transaction::new(250, "Tickets")));
        assert_eq!(account.balance(), 50);
        assert_eq!(account.transactions().len(), 2);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the balance never goes negative and equals the sum of
            /// the accepted transactions only.
            #[test]
            fn prop_balance_is_sum_of_accepted(values in prop::collection::vec(-500i64..500, 0..64)) {
                let mut account = FinancialAccount::new();
                let mut accepted = 0i64;
                for value in values {
                    if account.process_transaction(Transaction::new(value, "")) {
                        accepted += value;
                    }
                    prop_assert!(account.balance() >= 0);
                }
                prop_assert_eq!(account.balance(), accepted);
            }
        }
    }
}
