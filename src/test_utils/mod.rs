#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::{assert_failure, assert_success};

use axum_test::TestServer;
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, PasswordHash, build_router,
    db::initialize,
    money::Money,
    transaction::{NewTransaction, Transaction, TransactionType, create_transaction},
    user::{User, UserID, create_user},
};

/// A low bcrypt cost so that tests that hash passwords run quickly.
pub(crate) const TEST_PASSWORD_HASH_COST: u32 = 4;
pub(crate) const TEST_PASSWORD: &str = "hunter2";

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

/// Create the user "alice" with the password [TEST_PASSWORD].
pub(crate) fn create_test_user(connection: &Connection) -> User {
    create_user(
        "alice",
        "alice@example.com",
        PasswordHash::from_raw_password(TEST_PASSWORD, TEST_PASSWORD_HASH_COST)
            .expect("Could not hash password"),
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn create_test_transaction(
    user_id: UserID,
    transaction_type: TransactionType,
    cents: i64,
    category: &str,
    date: Date,
    connection: &Connection,
) -> Transaction {
    let new_transaction = NewTransaction::new(
        transaction_type,
        Money::from_cents(cents),
        category,
        "test transaction",
        date,
    )
    .expect("Could not validate test transaction");

    create_transaction(user_id, new_transaction, connection)
        .expect("Could not create test transaction")
}

pub(crate) fn get_test_app_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not create in-memory SQLite database");

    AppState::new(conn, "Etc/UTC")
        .expect("Could not create app state")
        .with_password_hash_cost(TEST_PASSWORD_HASH_COST)
}

/// A server running the full router against `state`.
pub(crate) fn get_test_server(state: &AppState) -> TestServer {
    TestServer::new(build_router(state.clone()))
}
