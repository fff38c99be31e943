use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{Error, transaction::NewTransaction, validation::require};

/// The JSON body for creating or updating a transaction.
///
/// Every field is optional so that a missing field is reported as
/// [Error::MissingFields] rather than as a malformed request.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    /// The owner of a new transaction. Ignored when updating.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Either "income" or "expense".
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// The amount as a JSON number or a numeric string.
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// The date in the format YYYY-MM-DD.
    #[serde(default)]
    pub date: Option<String>,
}

impl TransactionForm {
    /// Check that all the transaction fields are present and valid.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] if any field other than `user_id` is
    /// missing or empty, or the errors of [NewTransaction::parse].
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let transaction_type = require(self.transaction_type)?;
        let amount = self.amount.ok_or(Error::MissingFields)?;
        let category = require(self.category)?;
        let description = require(self.description)?;
        let date = require(self.date)?;

        NewTransaction::parse(&transaction_type, amount, &category, &description, &date)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{Error, money::Money, transaction::TransactionType};

    use super::TransactionForm;

    fn complete_form() -> TransactionForm {
        TransactionForm {
            user_id: Some(1),
            transaction_type: Some("expense".to_owned()),
            amount: Some(Decimal::from_str("45.99").unwrap()),
            category: Some("Food".to_owned()),
            description: Some("Groceries".to_owned()),
            date: Some("2024-01-10".to_owned()),
        }
    }

    #[test]
    fn validate_accepts_complete_form() {
        let transaction = complete_form().validate().unwrap();

        assert_eq!(transaction.transaction_type(), TransactionType::Expense);
        assert_eq!(transaction.amount(), Money::from_cents(4599));
        assert_eq!(transaction.category(), "Food");
        assert_eq!(transaction.description(), "Groceries");
        assert_eq!(transaction.date(), date!(2024 - 01 - 10));
    }

    #[test]
    fn validate_fails_on_missing_fields() {
        let forms = [
            TransactionForm {
                transaction_type: None,
                ..complete_form()
            },
            TransactionForm {
                amount: None,
                ..complete_form()
            },
            TransactionForm {
                category: Some(String::new()),
                ..complete_form()
            },
            TransactionForm {
                description: None,
                ..complete_form()
            },
            TransactionForm {
                date: Some(String::new()),
                ..complete_form()
            },
        ];

        for form in forms {
            assert_eq!(form.validate(), Err(Error::MissingFields));
        }
    }

    #[test]
    fn deserializes_amount_from_string_or_number() {
        let from_number: TransactionForm =
            serde_json::from_str(r#"{"amount": 12.5, "type": "income"}"#).unwrap();
        let from_string: TransactionForm =
            serde_json::from_str(r#"{"amount": "12.5", "type": "income"}"#).unwrap();

        assert_eq!(from_number.amount, Some(Decimal::from_str("12.5").unwrap()));
        assert_eq!(from_string.amount, Some(Decimal::from_str("12.5").unwrap()));
        assert_eq!(from_number.transaction_type.as_deref(), Some("income"));
    }
}
