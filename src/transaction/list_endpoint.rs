//! Defines the endpoint for listing a user's transactions.

use std::str::FromStr;

use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    envelope::Envelope,
    transaction::{Transaction, TransactionState, TransactionType, get_transactions_by_user},
    user::UserID,
};

/// The query string for filtering the transaction list.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    /// Only list transactions of this type. "all" or no value lists every transaction.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
}

impl TransactionFilter {
    fn transaction_type(&self) -> Result<Option<TransactionType>, Error> {
        match self.transaction_type.as_deref() {
            None | Some("all") => Ok(None),
            Some(transaction_type) => TransactionType::from_str(transaction_type).map(Some),
        }
    }
}

#[derive(Debug, Serialize)]
struct TransactionList {
    transactions: Vec<Transaction>,
}

/// A route handler for listing all of a user's transactions, newest first.
///
/// A user without any transactions, or an unknown user, gets an empty list.
/// The optional `type` query parameter restricts the list to income or expenses.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    user_id: Result<Path<i64>, PathRejection>,
    filter: Result<Query<TransactionFilter>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let user_id = UserID::new(user_id);
    let Query(filter) = filter?;
    let wanted_type = filter.transaction_type()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut transactions = get_transactions_by_user(user_id, &connection)?;
    if let Some(wanted_type) = wanted_type {
        transactions.retain(|transaction| transaction.transaction_type == wanted_type);
    }

    Ok(Envelope::success(TransactionList { transactions }))
}
