//! Summaries, category breakdowns and monthly trends of a user's transactions.

mod aggregation;
mod handlers;

pub use aggregation::{
    CategoryTotal, DEFAULT_RECENT_ACTIVITY_LIMIT, MonthlySummary, MonthlyTrend, TrendRow,
    TypeSummary, TypeTotal, YearMonth, category_breakdown, monthly_summary, monthly_trend,
    recent_activity, trend_rows, type_summary,
};
pub use handlers::{
    get_categories_endpoint, get_monthly_summary_endpoint, get_summary_endpoint,
    get_trends_endpoint,
};
