//! The suggested categories for each kind of transaction.
//!
//! The store accepts any non-empty category, these lists only drive the
//! options offered to the client.

use serde::Serialize;

use crate::transaction::TransactionType;

/// Suggested categories for income.
pub const INCOME_CATEGORIES: [&str; 6] = [
    "Salary",
    "Freelance",
    "Business",
    "Investment",
    "Gift",
    "Other",
];

/// Suggested categories for expenses.
pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Bills",
    "Education",
    "Travel",
    "Other",
];

/// Get the suggested categories for `transaction_type`.
pub fn categories_for(transaction_type: TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// The category options for every transaction type, ready to be serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOptions {
    /// Options for income transactions.
    pub income: &'static [&'static str],
    /// Options for expense transactions.
    pub expense: &'static [&'static str],
}

impl Default for CategoryOptions {
    fn default() -> Self {
        Self {
            income: categories_for(TransactionType::Income),
            expense: categories_for(TransactionType::Expense),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{category::categories_for, transaction::TransactionType};

    #[test]
    fn both_types_offer_other() {
        assert!(categories_for(TransactionType::Income).contains(&"Other"));
        assert!(categories_for(TransactionType::Expense).contains(&"Other"));
    }

    #[test]
    fn salary_is_only_offered_for_income() {
        assert!(categories_for(TransactionType::Income).contains(&"Salary"));
        assert!(!categories_for(TransactionType::Expense).contains(&"Salary"));
    }
}
