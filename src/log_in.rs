//! This file defines the route for handling log-in requests.
//!
//! There are no sessions: a successful log in returns the user's ID, which
//! the client passes back in the paths and bodies of later requests.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    envelope::Envelope,
    user::{UserID, get_user_by_username},
};

/// The state needed to check a user's credentials.
#[derive(Debug, Clone)]
pub struct LoginState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LogInData {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoggedInPayload {
    user_id: UserID,
    username: String,
    redirect: &'static str,
}

/// Check the user's credentials and respond with their ID and username.
///
/// An unknown username and a wrong password get the same response so that
/// the client cannot tell which usernames are registered.
pub async fn post_log_in(
    State(state): State<LoginState>,
    user_data: Result<Json<LogInData>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(user_data) = user_data?;
    let (Some(username), Some(password)) = (user_data.username, user_data.password) else {
        return Err(Error::MissingCredentials);
    };
    if username.is_empty() || password.is_empty() {
        return Err(Error::MissingCredentials);
    }

    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_username(&username, &connection) {
            Ok(user) => user,
            Err(Error::UserNotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    let is_password_valid = user.password_hash.verify(&password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("User {} logged in", user.id);

    Ok(Envelope::success(LoggedInPayload {
        user_id: user.id,
        username: user.username,
        redirect: endpoints::DASHBOARD_VIEW,
    })
    .with_message("Login successful"))
}
