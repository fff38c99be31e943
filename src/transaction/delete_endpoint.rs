use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};

use crate::{
    Error,
    database_id::TransactionId,
    envelope::Envelope,
    transaction::{TransactionState, delete_transaction},
};

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(transaction_id) = transaction_id?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &connection)
        .inspect_err(|error| tracing::debug!("Could not delete transaction {transaction_id}: {error}"))?;

    Ok(Envelope::ok("Transaction deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::macros::date;

    use crate::{
        Error,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_failure, assert_success, create_test_transaction, create_test_user,
            get_test_app_state, get_test_server,
        },
        transaction::{TransactionType, get_transaction},
    };

    #[tokio::test]
    async fn deletes_transaction_once() {
        let state = get_test_app_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user(&connection);
            create_test_transaction(
                user.id,
                TransactionType::Expense,
                123,
                "Food",
                date!(2025 - 10 - 26),
                &connection,
            )
        };
        let server = get_test_server(&state);
        let path = format_endpoint(endpoints::TRANSACTION, transaction.id);

        let body = assert_success(&server.delete(&path).await);
        assert_eq!(body["message"], "Transaction deleted successfully");
        assert_eq!(
            get_transaction(transaction.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );

        assert_failure(
            &server.delete(&path).await,
            StatusCode::NOT_FOUND,
            "Transaction not found",
        );
    }
}
