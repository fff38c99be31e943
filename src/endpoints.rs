//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/user/{id}', use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for a single transaction.
///
/// `GET` lists the transactions of the user with this ID, while `PUT` and
/// `DELETE` act on the transaction with this ID. The parameter shares one
/// name since the router does not allow two names in the same position.
pub const TRANSACTION: &str = "/transactions/{id}";
/// The route to get, update or delete a user's profile.
pub const USER: &str = "/user/{id}";
/// The route for the income and expense totals of a user.
pub const ANALYTICS_SUMMARY: &str = "/analytics/summary/{user_id}";
/// The route for a user's expenses grouped by category.
pub const ANALYTICS_CATEGORIES: &str = "/analytics/categories/{user_id}";
/// The route for a user's monthly income and expense totals.
pub const ANALYTICS_TRENDS: &str = "/analytics/trends/{user_id}";
/// The route for a user's totals in a single month.
pub const ANALYTICS_MONTHLY: &str = "/analytics/monthly/{user_id}";
/// The route for the dashboard data of a user.
pub const DASHBOARD: &str = "/dashboard/{user_id}";

/// The page the client should go to after registering.
pub const LOG_IN_VIEW: &str = "/login.html";
/// The page the client should go to after logging in.
pub const DASHBOARD_VIEW: &str = "/dashboard.html";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/user/{id}', '{id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
