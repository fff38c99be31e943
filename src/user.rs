//! Code for creating the user table and managing users in the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, PasswordHash,
    validation::{EMAIL_MAX_LENGTH, USERNAME_MAX_LENGTH, validate_text},
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Serializes to the public profile: the password hash is never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's unique email address.
    pub email: String,
    /// The user's password hash.
    #[serde(skip)]
    pub password_hash: PasswordHash,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyField] or [Error::FieldTooLong] if `username` or `email` are invalid,
/// - [Error::DuplicateUsername] or [Error::DuplicateEmail] if either is already taken,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    username: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let username = validate_text("username", username, USERNAME_MAX_LENGTH)?;
    let email = validate_text("email", email, EMAIL_MAX_LENGTH)?;
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO user (username, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
        (&username, &email, password_hash.as_ref(), created_at),
    )?;

    let id = UserID::new(connection.last_insert_rowid());
    tracing::info!("Registered user {id} ({username})");

    Ok(User {
        id,
        username,
        email,
        password_hash,
        created_at,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user ([Error::UserNotFound]).
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
            error => error.into(),
        })
}

/// Get the user from the database with the given `username`.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if no user has that username, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, username, email, password, created_at FROM user WHERE username = :username",
        )?
        .query_row(&[(":username", &username)], map_user_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
            error => error.into(),
        })
}

/// Update the email address of a user and, if given, their password.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyField] or [Error::FieldTooLong] if `email` is invalid,
/// - [Error::UserNotFound] if `user_id` does not belong to a registered user,
/// - [Error::DuplicateEmail] if another user already has `email`,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn update_user(
    user_id: UserID,
    email: &str,
    password_hash: Option<&PasswordHash>,
    connection: &Connection,
) -> Result<(), Error> {
    let email = validate_text("email", email, EMAIL_MAX_LENGTH)?;

    let rows_affected = match password_hash {
        Some(password_hash) => connection.execute(
            "UPDATE user SET email = ?1, password = ?2 WHERE id = ?3",
            (&email, password_hash.as_ref(), user_id.as_i64()),
        )?,
        None => connection.execute(
            "UPDATE user SET email = ?1 WHERE id = ?2",
            (&email, user_id.as_i64()),
        )?,
    };

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}

/// Delete a user and, through the foreign key cascade, all of their transactions.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if `user_id` does not belong to a registered
/// user, or [Error::SqlError] if an SQL related error occurred.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM user WHERE id = ?1", (user_id.as_i64(),))?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    tracing::info!("Deleted user {user_id} and their transactions");

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
#[cfg(test)]
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))?;

    Ok(usize::try_from(count).unwrap_or_default())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at: row.get(4)?,
    })
}
