//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, PasswordHash, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            password_hash_cost: PasswordHash::DEFAULT_COST,
            db_connection: connection,
        })
    }

    /// Use `cost` for hashing passwords instead of the default.
    pub fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }
}
