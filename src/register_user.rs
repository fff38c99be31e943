//! The endpoint for registering a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword, endpoints, envelope::Envelope,
    user::create_user, validation::require,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used to hash the new user's password.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct RegisteredPayload {
    redirect: &'static str,
}

/// Create a new user and point the client to the log-in page.
pub async fn register_user(
    State(state): State<RegistrationState>,
    user_data: Result<Json<RegisterForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(user_data) = user_data?;
    let username = require(user_data.username)?;
    let email = require(user_data.email)?;
    let password = require(user_data.password)?;

    let validated_password = ValidatedPassword::new(&password)?;
    let password_hash = PasswordHash::new(validated_password, state.password_hash_cost)
        .inspect_err(|error| {
            tracing::error!("an error occurred while hashing a password: {error}")
        })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_user(&username, &email, password_hash, &connection)?;

    Ok(Envelope::success(RegisteredPayload {
        redirect: endpoints::LOG_IN_VIEW,
    })
    .with_message("Registration successful! Please login."))
}
