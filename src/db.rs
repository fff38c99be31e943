//! Database initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, transaction::create_transaction_table, user::create_user_table};

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection`, which is needed
/// for transactions to be deleted along with their owner.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
