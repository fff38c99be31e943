//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    analytics::{
        get_categories_endpoint, get_monthly_summary_endpoint, get_summary_endpoint,
        get_trends_endpoint,
    },
    dashboard::get_dashboard_endpoint,
    endpoints,
    log_in::post_log_in,
    not_found::get_404_not_found,
    profile::{delete_profile_endpoint, get_profile_endpoint, update_profile_endpoint},
    register_user::register_user,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests for unknown routes, or with a method a route does not support,
/// get a 404 envelope.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(list_transactions_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::USER,
            get(get_profile_endpoint)
                .put(update_profile_endpoint)
                .delete(delete_profile_endpoint),
        )
        .route(endpoints::ANALYTICS_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::ANALYTICS_CATEGORIES, get(get_categories_endpoint))
        .route(endpoints::ANALYTICS_TRENDS, get(get_trends_endpoint))
        .route(
            endpoints::ANALYTICS_MONTHLY,
            get(get_monthly_summary_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_404_not_found)
        .with_state(state)
}
