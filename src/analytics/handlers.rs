//! Analytics HTTP handlers.
//!
//! Each handler loads a snapshot of the user's transactions and hands it to
//! the pure functions in [super::aggregation]. An unknown user simply has no
//! transactions, so every total is zero.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{
        FromRef, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    analytics::aggregation::{
        CategoryTotal, MonthlySummary, TrendRow, TypeSummary, category_breakdown, monthly_summary,
        monthly_trend, trend_rows, type_summary,
    },
    envelope::Envelope,
    timezone::get_local_date,
    transaction::{Transaction, get_transactions_by_user},
    user::UserID,
};

/// The state needed for the analytics endpoints.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryPayload {
    summary: TypeSummary,
}

#[derive(Debug, Serialize)]
struct CategoriesPayload {
    categories: Vec<CategoryTotal>,
}

#[derive(Debug, Serialize)]
struct TrendsPayload {
    trends: Vec<TrendRow>,
}

#[derive(Debug, Serialize)]
struct MonthlyPayload {
    summary: MonthlySummary,
    year: i32,
    month: u8,
}

/// The optional period for the monthly summary, defaults to the current month.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    year: Option<i32>,
    month: Option<u8>,
}

/// Load the transactions of `user_id` while holding the database lock.
fn load_transactions(
    db_connection: &Mutex<Connection>,
    user_id: UserID,
) -> Result<Vec<Transaction>, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions_by_user(user_id, &connection)
}

/// Get the total and count of a user's income and of their expenses.
pub async fn get_summary_endpoint(
    State(state): State<AnalyticsState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let transactions = load_transactions(&state.db_connection, UserID::new(user_id))?;

    Ok(Envelope::success(SummaryPayload {
        summary: type_summary(&transactions),
    }))
}

/// Get a user's expenses grouped by category, largest first.
pub async fn get_categories_endpoint(
    State(state): State<AnalyticsState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let transactions = load_transactions(&state.db_connection, UserID::new(user_id))?;

    Ok(Envelope::success(CategoriesPayload {
        categories: category_breakdown(&transactions),
    }))
}

/// Get a user's income and expense totals for each month, oldest first.
pub async fn get_trends_endpoint(
    State(state): State<AnalyticsState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let transactions = load_transactions(&state.db_connection, UserID::new(user_id))?;

    Ok(Envelope::success(TrendsPayload {
        trends: trend_rows(&monthly_trend(&transactions)),
    }))
}

/// Get a user's income, expenses and balance for a single month.
///
/// The year and month default to today's in the server's local timezone.
pub async fn get_monthly_summary_endpoint(
    State(state): State<AnalyticsState>,
    user_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = user_id?;
    let Query(query) = query?;

    let (year, month) = match (query.year, query.month) {
        (Some(year), Some(month)) => (year, month),
        (year, month) => {
            let today = get_local_date(&state.local_timezone)?;
            (
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month() as u8),
            )
        }
    };
    let calendar_month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

    let transactions = load_transactions(&state.db_connection, UserID::new(user_id))?;

    Ok(Envelope::success(MonthlyPayload {
        summary: monthly_summary(&transactions, year, calendar_month),
        year,
        month,
    }))
}
