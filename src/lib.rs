//! A personal budget tracker.
//!
//! Users register, log in and record income and expense transactions. The
//! crate turns a user's transactions into monthly totals, category breakdowns
//! and monthly trends, and serves them, along with the transactions
//! themselves, through a JSON REST API.
//!
//! Every response uses the same envelope: `{success, message?, ...payload}`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod analytics;
mod app_state;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod envelope;
mod log_in;
mod logging;
mod money;
mod not_found;
mod password;
mod profile;
mod register_user;
mod routing;
mod timezone;
mod transaction;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use analytics::{
    CategoryTotal, MonthlySummary, MonthlyTrend, TrendRow, TypeSummary, TypeTotal, YearMonth,
    category_breakdown, monthly_summary, monthly_trend, recent_activity, trend_rows,
    type_summary,
};
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Money;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use user::{User, UserID};

use crate::envelope::Envelope;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were missing from the request body.
    #[error("all fields are required")]
    MissingFields,

    /// The username or password was missing from a log in request.
    #[error("both username and password are required")]
    MissingCredentials,

    /// A required text field contained only whitespace.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A text field was longer than its column allows.
    #[error("{field} must be at most {max_length} characters")]
    FieldTooLong {
        /// The name of the offending field.
        field: &'static str,
        /// The maximum number of characters allowed.
        max_length: usize,
    },

    /// A transaction amount was zero or negative after rounding to cents.
    #[error("amount must be a positive number")]
    InvalidAmount,

    /// A transaction amount was larger than 99,999,999.99.
    #[error("amount is too large")]
    AmountTooLarge,

    /// The transaction type was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// A date string was not a valid calendar date in the format YYYY-MM-DD.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A month outside 1-12 was requested.
    #[error("{0} is not a valid month")]
    InvalidMonth(u8),

    /// The request could not be parsed, e.g. malformed JSON or a non-numeric ID.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The user ID does not refer to a registered user.
    #[error("the user could not be found")]
    UserNotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The username is already taken by another user.
    #[error("the username is already in use")]
    DuplicateUsername,

    /// The email address is already used by another user.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A date could not be formatted for display.
    #[error("could not format date: {0}")]
    DateFormatError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            // The only foreign key in the schema is the owner of a transaction.
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Error::UserNotFound
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields
            | Error::MissingCredentials
            | Error::EmptyField(_)
            | Error::FieldTooLong { .. }
            | Error::InvalidAmount
            | Error::AmountTooLarge
            | Error::InvalidTransactionType(_)
            | Error::InvalidDate(_)
            | Error::InvalidMonth(_)
            | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::UserNotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateUsername | Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::InvalidTimezone(_)
            | Error::DateFormatError(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client.
    ///
    /// Internal errors get a generic message so that no diagnostic detail
    /// leaks out of the server.
    fn client_message(&self) -> String {
        match self {
            Error::MissingFields => "All fields are required".to_owned(),
            Error::MissingCredentials => "Please enter both username and password".to_owned(),
            Error::InvalidCredentials => "Invalid username or password".to_owned(),
            Error::UserNotFound => "User not found".to_owned(),
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                "Transaction not found".to_owned()
            }
            Error::NotFound => "Resource not found".to_owned(),
            Error::DuplicateUsername => "Username already exists".to_owned(),
            Error::DuplicateEmail => "Email already exists".to_owned(),
            Error::EmptyField(_)
            | Error::FieldTooLong { .. }
            | Error::InvalidAmount
            | Error::AmountTooLarge
            | Error::InvalidTransactionType(_)
            | Error::InvalidDate(_)
            | Error::InvalidMonth(_)
            | Error::InvalidRequest(_) => capitalize(&self.to_string()),
            Error::HashingError(_)
            | Error::InvalidTimezone(_)
            | Error::DateFormatError(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => "Something went wrong!".to_owned(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        Envelope::failure(status, self.client_message()).into_response()
    }
}
