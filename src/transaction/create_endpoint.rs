//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    Error,
    database_id::TransactionId,
    envelope::Envelope,
    transaction::{TransactionState, create_transaction, form::TransactionForm},
    user::UserID,
};

#[derive(Debug, Serialize)]
struct CreatedTransaction {
    id: TransactionId,
}

/// A route handler for creating a new transaction, responds with the ID of the new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(form) = form?;
    let user_id = form.user_id.map(UserID::new).ok_or(Error::MissingFields)?;
    let new_transaction = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(user_id, new_transaction, &connection)?;

    Ok(
        Envelope::success(CreatedTransaction { id: transaction.id })
            .with_message("Transaction added successfully"),
    )
}
