//! Dashboard module
//!
//! Provides an overview of the current month along with recent activity and
//! chart data, formatted for display.

mod handlers;
mod view;

pub use handlers::get_dashboard_endpoint;
