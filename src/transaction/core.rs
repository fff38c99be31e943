//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{
    Error,
    database_id::TransactionId,
    money::Money,
    user::UserID,
    validation::{CATEGORY_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, validate_text},
};

// ============================================================================
// MODELS
// ============================================================================

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive, the direction of the money is given by
/// `transaction_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned in this transaction.
    pub amount: Money,
    /// What kind of income or expense this was, e.g. "Salary" or "Food".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated, user editable fields of a transaction.
///
/// Used both to create transactions and to replace the fields of an existing
/// transaction. Create one with [NewTransaction::new] or [NewTransaction::parse].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    transaction_type: TransactionType,
    amount: Money,
    category: String,
    description: String,
    date: Date,
}

impl NewTransaction {
    /// Validate the fields of a transaction.
    ///
    /// `category` and `description` are trimmed.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::InvalidAmount] if `amount` is not positive,
    /// - [Error::EmptyField] if `category` or `description` are blank,
    /// - [Error::FieldTooLong] if `category` or `description` are too long.
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        category: &str,
        description: &str,
        date: Date,
    ) -> Result<Self, Error> {
        if amount.cents() <= 0 {
            return Err(Error::InvalidAmount);
        }

        Ok(Self {
            transaction_type,
            amount,
            category: validate_text("category", category, CATEGORY_MAX_LENGTH)?,
            description: validate_text("description", description, DESCRIPTION_MAX_LENGTH)?,
            date,
        })
    }

    /// Validate the raw text fields of a request.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [NewTransaction::new], returns:
    /// - [Error::InvalidTransactionType] if `transaction_type` is not "income" or "expense",
    /// - [Error::InvalidAmount] or [Error::AmountTooLarge] if `amount` is out of range,
    /// - [Error::InvalidDate] if `date` is not a date in the format YYYY-MM-DD.
    pub fn parse(
        transaction_type: &str,
        amount: rust_decimal::Decimal,
        category: &str,
        description: &str,
        date: &str,
    ) -> Result<Self, Error> {
        let transaction_type = transaction_type.parse()?;
        let amount = Money::transaction_amount(amount)?;
        let date = parse_date(date)?;

        Self::new(transaction_type, amount, category, description, date)
    }

    /// Whether money was earned or spent.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// The positive amount of money.
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// The category of the transaction.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The description of the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }
}

/// Parse a date in the format YYYY-MM-DD.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, type, amount, category, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, type, amount, category, description, date, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.transaction_type,
                new_transaction.amount.cents(),
                new_transaction.category,
                new_transaction.description,
                new_transaction.date,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    tracing::debug!(
        "Created {} transaction {} for user {user_id}",
        transaction.transaction_type,
        transaction.id
    );

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, type, amount, category, description, date, created_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get all of the transactions owned by `user_id`.
///
/// Transactions are sorted by date, newest first. Transactions on the same
/// date are sorted by ID so that the most recently added comes first.
/// An unknown user simply has no transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, type, amount, category, description, date, created_at
             FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace the editable fields of the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET type = ?1, amount = ?2, category = ?3, description = ?4, date = ?5
         WHERE id = ?6",
        (
            new_transaction.transaction_type,
            new_transaction.amount.cents(),
            new_transaction.category,
            new_transaction.description,
            new_transaction.date,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
///   which includes a transaction that was already deleted,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount INTEGER NOT NULL CHECK (amount > 0),
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Index used for listing a user's transactions.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let transaction_type = row.get(2)?;
    let amount = Money::from_cents(row.get(3)?);
    let category = row.get(4)?;
    let description = row.get(5)?;
    let date = row.get(6)?;
    let created_at = row.get(7)?;

    Ok(Transaction {
        id,
        user_id,
        transaction_type,
        amount,
        category,
        description,
        date,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        money::Money,
        transaction::{NewTransaction, TransactionType, core::parse_date},
    };

    #[test]
    fn parses_transaction_types() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert_eq!(
            "Income".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("Income".to_owned()))
        );
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(parse_date("2024-02-29"), Ok(date!(2024 - 02 - 29)));
        assert_eq!(
            parse_date("2023-02-29"),
            Err(Error::InvalidDate("2023-02-29".to_owned()))
        );
        assert_eq!(
            parse_date("05/01/2024"),
            Err(Error::InvalidDate("05/01/2024".to_owned()))
        );
    }

    #[test]
    fn new_rejects_non_positive_amount() {
        let result = NewTransaction::new(
            TransactionType::Expense,
            Money::ZERO,
            "Food",
            "Lunch",
            date!(2024 - 01 - 10),
        );

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn new_rejects_blank_category() {
        let result = NewTransaction::new(
            TransactionType::Expense,
            Money::from_cents(100),
            "   ",
            "Lunch",
            date!(2024 - 01 - 10),
        );

        assert_eq!(result, Err(Error::EmptyField("category")));
    }

    #[test]
    fn parse_rejects_negative_amount() {
        let result = NewTransaction::parse(
            "expense",
            Decimal::from_str("-12.50").unwrap(),
            "Food",
            "Lunch",
            "2024-01-10",
        );

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn parse_rejects_unknown_type() {
        let result = NewTransaction::parse(
            "transfer",
            Decimal::from_str("12.50").unwrap(),
            "Food",
            "Lunch",
            "2024-01-10",
        );

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn parse_rounds_amount_to_cents() {
        let transaction = NewTransaction::parse(
            "income",
            Decimal::from_str("10.005").unwrap(),
            "Gift",
            "Birthday",
            "2024-01-10",
        )
        .unwrap();

        assert_eq!(transaction.amount(), Money::from_cents(1001));
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        money::Money,
        test_utils::{create_test_user, get_test_connection},
        transaction::{
            NewTransaction, TransactionType, create_transaction, delete_transaction,
            get_transaction, get_transactions_by_user, update_transaction,
        },
        user::{UserID, delete_user},
    };

    fn expense(cents: i64, date: time::Date, description: &str) -> NewTransaction {
        NewTransaction::new(
            TransactionType::Expense,
            Money::from_cents(cents),
            "Food",
            description,
            date,
        )
        .unwrap()
    }

    fn count_rows(connection: &Connection) -> i64 {
        connection
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);

        let result = create_transaction(
            user.id,
            expense(1230, date!(2025 - 10 - 05), "Lunch"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.user_id, user.id);
                assert_eq!(transaction.transaction_type, TransactionType::Expense);
                assert_eq!(transaction.amount, Money::from_cents(1230));
                assert_eq!(transaction.category, "Food");
                assert_eq!(transaction.description, "Lunch");
                assert_eq!(transaction.date, date!(2025 - 10 - 05));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_unknown_user() {
        let conn = get_test_connection();

        let result = create_transaction(
            UserID::new(42),
            expense(1230, date!(2025 - 10 - 05), "Lunch"),
            &conn,
        );

        assert_eq!(result, Err(Error::UserNotFound));
        assert_eq!(count_rows(&conn), 0);
    }

    #[test]
    fn created_transaction_round_trips() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let created = create_transaction(
            user.id,
            expense(4599, date!(2025 - 01 - 15), "Coffee"),
            &conn,
        )
        .unwrap();

        let listed = get_transactions_by_user(user.id, &conn).unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].transaction_type, created.transaction_type);
        assert_eq!(listed[0].amount, created.amount);
        assert_eq!(listed[0].category, created.category);
        assert_eq!(listed[0].description, created.description);
        assert_eq!(listed[0].date, created.date);
    }

    #[test]
    fn list_sorts_by_date_then_insertion_order() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let oldest =
            create_transaction(user.id, expense(100, date!(2024 - 01 - 01), "a"), &conn).unwrap();
        let same_day_first =
            create_transaction(user.id, expense(200, date!(2024 - 03 - 01), "b"), &conn).unwrap();
        let newest =
            create_transaction(user.id, expense(300, date!(2024 - 05 - 01), "c"), &conn).unwrap();
        let same_day_second =
            create_transaction(user.id, expense(400, date!(2024 - 03 - 01), "d"), &conn).unwrap();

        let got: Vec<_> = get_transactions_by_user(user.id, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.id)
            .collect();

        assert_eq!(
            got,
            vec![newest.id, same_day_second.id, same_day_first.id, oldest.id]
        );
    }

    #[test]
    fn list_only_returns_transactions_of_user() {
        let conn = get_test_connection();
        let alice = create_test_user(&conn);
        let bob = crate::user::create_user(
            "bob",
            "bob@example.com",
            crate::PasswordHash::new_unchecked("hunter3"),
            &conn,
        )
        .unwrap();
        create_transaction(alice.id, expense(100, date!(2024 - 01 - 01), "a"), &conn).unwrap();

        assert_eq!(get_transactions_by_user(bob.id, &conn), Ok(vec![]));
        assert_eq!(get_transactions_by_user(UserID::new(999), &conn), Ok(vec![]));
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let transaction =
            create_transaction(user.id, expense(100, date!(2024 - 01 - 01), "a"), &conn).unwrap();
        let replacement = NewTransaction::new(
            TransactionType::Income,
            Money::from_cents(250_000),
            "Salary",
            "January pay",
            date!(2024 - 01 - 31),
        )
        .unwrap();

        update_transaction(transaction.id, replacement, &conn).unwrap();

        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(got.transaction_type, TransactionType::Income);
        assert_eq!(got.amount, Money::from_cents(250_000));
        assert_eq!(got.category, "Salary");
        assert_eq!(got.description, "January pay");
        assert_eq!(got.date, date!(2024 - 01 - 31));
        assert_eq!(got.created_at, transaction.created_at);
    }

    #[test]
    fn update_fails_on_missing_transaction() {
        let conn = get_test_connection();

        let result = update_transaction(42, expense(100, date!(2024 - 01 - 01), "a"), &conn);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_succeeds_once() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let transaction =
            create_transaction(user.id, expense(100, date!(2024 - 01 - 01), "a"), &conn).unwrap();

        assert_eq!(delete_transaction(transaction.id, &conn), Ok(()));
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
        assert_eq!(
            delete_transaction(transaction.id, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn deleting_user_deletes_their_transactions() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        for i in 1..=3 {
            create_transaction(user.id, expense(i * 100, date!(2024 - 01 - 01), "a"), &conn)
                .unwrap();
        }

        delete_user(user.id, &conn).unwrap();

        assert_eq!(get_transactions_by_user(user.id, &conn), Ok(vec![]));
        assert_eq!(count_rows(&conn), 0);
    }
}
