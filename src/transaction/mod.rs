//! Transaction management for the budget tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `NewTransaction` fields
//! - Database functions for storing, querying, and managing transactions
//! - The JSON endpoints for listing, creating, updating and deleting transactions

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, get_transactions_by_user, update_transaction,
};
pub(crate) use core::iso_date;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;

/// The state needed to manage transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
