//! The endpoints for viewing, updating and deleting a user's account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    envelope::Envelope,
    user::{User, UserID, delete_user, get_user_by_id, update_user},
    validation::require,
};

/// The state needed to manage a user's profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The bcrypt cost used when the password is changed.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfilePayload {
    user: User,
}

/// The JSON body for updating a profile.
///
/// A missing or blank password leaves the current password unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Get the public profile of a user.
pub async fn get_profile_endpoint(
    State(state): State<ProfileState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(UserID::new(user_id), &connection)?;

    Ok(Envelope::success(ProfilePayload { user }))
}

/// Update a user's email address and, if given, their password.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    user_id: Result<Path<i64>, PathRejection>,
    form: Result<Json<ProfileForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let Json(form) = form?;
    let email = require(form.email)?;

    let password_hash = match form.password {
        Some(password) if !password.trim().is_empty() => Some(
            PasswordHash::from_raw_password(&password, state.password_hash_cost).inspect_err(
                |error| tracing::error!("an error occurred while hashing a password: {error}"),
            )?,
        ),
        _ => None,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_user(
        UserID::new(user_id),
        &email,
        password_hash.as_ref(),
        &connection,
    )?;

    Ok(Envelope::ok("Profile updated successfully"))
}

/// Delete a user along with all of their transactions.
pub async fn delete_profile_endpoint(
    State(state): State<ProfileState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_user(UserID::new(user_id), &connection)?;

    Ok(Envelope::ok("Account deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            TEST_PASSWORD, assert_failure, assert_success, create_test_transaction,
            create_test_user, get_test_app_state, get_test_server,
        },
        transaction::{TransactionType, get_transactions_by_user},
        user::{create_user, get_user_by_id},
    };

    #[tokio::test]
    async fn get_profile_hides_password() {
        let state = get_test_app_state();
        let user = create_test_user(&state.db_connection.lock().unwrap());
        let server = get_test_server(&state);

        let response = server
            .get(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .await;

        let body = assert_success(&response);
        assert_eq!(body["user"]["id"], user.id.as_i64());
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["email"], "alice@example.com");
        assert!(body["user"]["created_at"].is_string());
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn get_profile_fails_on_unknown_user() {
        let state = get_test_app_state();
        let server = get_test_server(&state);

        let response = server.get(&format_endpoint(endpoints::USER, 42)).await;

        assert_failure(&response, StatusCode::NOT_FOUND, "User not found");
    }

    #[tokio::test]
    async fn update_with_blank_password_keeps_password() {
        let state = get_test_app_state();
        let user = create_test_user(&state.db_connection.lock().unwrap());
        let server = get_test_server(&state);

        let response = server
            .put(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .json(&json!({"email": "alice@example.org", "password": "  "}))
            .await;

        let body = assert_success(&response);
        assert_eq!(body["message"], "Profile updated successfully");
        let updated = get_user_by_id(user.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.email, "alice@example.org");
        assert!(updated.password_hash.verify(TEST_PASSWORD).unwrap());
    }

    #[tokio::test]
    async fn update_with_password_changes_password() {
        let state = get_test_app_state();
        let user = create_test_user(&state.db_connection.lock().unwrap());
        let server = get_test_server(&state);

        server
            .put(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .json(&json!({"email": "alice@example.com", "password": "anewpassword"}))
            .await
            .assert_status_ok();

        let updated = get_user_by_id(user.id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(updated.password_hash.verify("anewpassword").unwrap());
        assert!(!updated.password_hash.verify(TEST_PASSWORD).unwrap());
    }

    #[tokio::test]
    async fn update_fails_on_email_of_other_user() {
        let state = get_test_app_state();
        let user = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user(&connection);
            create_user(
                "bob",
                "bob@example.com",
                crate::PasswordHash::new_unchecked("hunter3"),
                &connection,
            )
            .unwrap();
            user
        };
        let server = get_test_server(&state);

        let response = server
            .put(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .json(&json!({"email": "bob@example.com"}))
            .await;

        assert_failure(&response, StatusCode::CONFLICT, "Email already exists");
    }

    #[tokio::test]
    async fn update_fails_on_unknown_user() {
        let state = get_test_app_state();
        let server = get_test_server(&state);

        let response = server
            .put(&format_endpoint(endpoints::USER, 42))
            .json(&json!({"email": "nobody@example.com"}))
            .await;

        assert_failure(&response, StatusCode::NOT_FOUND, "User not found");
    }

    #[tokio::test]
    async fn delete_removes_user_and_transactions() {
        let state = get_test_app_state();
        let user = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user(&connection);
            create_test_transaction(
                user.id,
                TransactionType::Expense,
                1_000,
                "Food",
                date!(2024 - 01 - 10),
                &connection,
            );
            user
        };
        let server = get_test_server(&state);
        let path = format_endpoint(endpoints::USER, user.id.as_i64());

        let body = assert_success(&server.delete(&path).await);
        assert_eq!(body["message"], "Account deleted successfully");
        assert!(
            get_transactions_by_user(user.id, &state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );

        let transactions = assert_success(
            &server
                .get(&format_endpoint(endpoints::TRANSACTION, user.id.as_i64()))
                .await,
        );
        assert_eq!(transactions["transactions"], json!([]));

        assert_failure(
            &server.delete(&path).await,
            StatusCode::NOT_FOUND,
            "User not found",
        );
    }
}
