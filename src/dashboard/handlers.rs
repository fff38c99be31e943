//! Dashboard HTTP handler.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    dashboard::view::{DashboardView, build_dashboard_view},
    envelope::Envelope,
    timezone::get_local_date,
    transaction::get_transactions_by_user,
    user::{UserID, get_user_by_id},
};

/// The state needed for displaying the dashboard.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading users and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DashboardPayload {
    dashboard: DashboardView,
}

/// Get the dashboard of a user for the current month.
///
/// The current month is taken from the wall clock in the server's local timezone.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let user_id = UserID::new(user_id);
    let today = get_local_date(&state.local_timezone)?;

    let (user, transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;
        let transactions = get_transactions_by_user(user_id, &connection)?;

        (user, transactions)
    };

    Ok(Envelope::success(DashboardPayload {
        dashboard: build_dashboard_view(&user.username, &transactions, today)?,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::OffsetDateTime;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_failure, assert_success, create_test_transaction, create_test_user,
            get_test_app_state, get_test_server,
        },
        transaction::TransactionType,
    };

    #[tokio::test]
    async fn dashboard_shows_current_month() {
        let state = get_test_app_state();
        let today = OffsetDateTime::now_utc().date();
        let user = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user(&connection);
            create_test_transaction(
                user.id,
                TransactionType::Income,
                123_450,
                "Salary",
                today,
                &connection,
            );
            create_test_transaction(
                user.id,
                TransactionType::Expense,
                5_000,
                "Food",
                today,
                &connection,
            );
            user
        };
        let server = get_test_server(&state);

        let response = server
            .get(&format_endpoint(endpoints::DASHBOARD, user.id.as_i64()))
            .await;

        let body = assert_success(&response);
        let dashboard = &body["dashboard"];
        assert_eq!(dashboard["username"], "alice");
        assert_eq!(
            dashboard["period"],
            format!("{} {}", today.month(), today.year())
        );
        assert_eq!(dashboard["total_income"], "₹1,234.50");
        assert_eq!(dashboard["total_expenses"], "₹50.00");
        assert_eq!(dashboard["balance"], "₹1,184.50");
        assert_eq!(dashboard["summary"]["balance"].to_string(), "1184.50");
        assert_eq!(dashboard["transaction_count"], 2);
        assert_eq!(
            dashboard["recent_transactions"][0]["formatted_amount"],
            "-₹50.00"
        );
        assert_eq!(dashboard["categories"]["income"][0], "Salary");
        assert_eq!(
            dashboard["charts"]["income_vs_expenses"]["labels"][1],
            "Expenses"
        );
    }

    #[tokio::test]
    async fn dashboard_fails_on_unknown_user() {
        let state = get_test_app_state();
        let server = get_test_server(&state);

        let response = server
            .get(&format_endpoint(endpoints::DASHBOARD, 42))
            .await;

        assert_failure(&response, StatusCode::NOT_FOUND, "User not found");
    }
}
