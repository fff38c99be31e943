//! Defines the endpoint for replacing the fields of a transaction.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};

use serde::Serialize;

use crate::{
    Error,
    database_id::TransactionId,
    envelope::Envelope,
    transaction::{
        Transaction, TransactionState, form::TransactionForm, get_transaction,
        update_transaction,
    },
};

#[derive(Debug, Serialize)]
struct UpdatedTransaction {
    transaction: Transaction,
}

/// A route handler for updating a transaction.
///
/// All of the editable fields are replaced, the owner and ID stay the same.
/// The response carries the transaction as stored after the update.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(transaction_id) = transaction_id?;
    let Json(form) = form?;
    let new_transaction = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_transaction(transaction_id, new_transaction, &connection)?;
    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(Envelope::success(UpdatedTransaction { transaction })
        .with_message("Transaction updated successfully"))
}
