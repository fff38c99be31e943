//! Turns aggregated transactions into the display-ready dashboard payload.
//!
//! Nothing here computes totals itself, it only arranges and formats the
//! output of the analytics functions.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    analytics::{
        DEFAULT_RECENT_ACTIVITY_LIMIT, MonthlySummary, YearMonth, category_breakdown,
        monthly_summary, monthly_trend, recent_activity, type_summary,
    },
    category::CategoryOptions,
    database_id::TransactionId,
    money::Money,
    transaction::{Transaction, TransactionType, iso_date},
};

const CURRENCY_SYMBOL: &str = "₹";

/// Everything the dashboard page shows for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// The name of the user the dashboard belongs to.
    pub username: String,
    /// The current month as text, e.g. "October 2026".
    pub period: String,
    /// The current year.
    pub year: i32,
    /// The current month, 1 to 12.
    pub month: u8,
    /// The totals of the current month.
    pub summary: MonthlySummary,
    /// The current month's income, e.g. "₹1,234.50".
    pub total_income: String,
    /// The current month's expenses, e.g. "₹200.00".
    pub total_expenses: String,
    /// The current month's balance, e.g. "-₹50.00".
    pub balance: String,
    /// The most recently added transactions, most recent first.
    pub recent_transactions: Vec<RecentTransaction>,
    /// The number of transactions the user has.
    pub transaction_count: usize,
    /// The categories offered when adding a transaction.
    pub categories: CategoryOptions,
    /// Data for the dashboard charts.
    pub charts: DashboardCharts,
}

/// A transaction in the recent activity list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub amount: Money,
    /// The amount with a sign showing its direction, e.g. "+₹1,000.00".
    pub formatted_amount: String,
}

/// Labels with one value each, e.g. for a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Money>,
}

/// Monthly income and expenses side by side, e.g. for a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    /// Month labels, e.g. "Jan 2024".
    pub labels: Vec<String>,
    pub income: Vec<Money>,
    pub expenses: Vec<Money>,
}

/// The data for each of the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    /// All-time income against all-time expenses.
    pub income_vs_expenses: ChartSeries,
    /// All-time expenses per category, largest first.
    pub expenses_by_category: ChartSeries,
    /// Income and expenses for each month with transactions.
    pub monthly_trend: TrendChart,
}

/// Build the dashboard of `username` for the month that `today` falls in.
///
/// # Errors
/// Returns [Error::DateFormatError] if a month label could not be formatted.
pub fn build_dashboard_view(
    username: &str,
    transactions: &[Transaction],
    today: Date,
) -> Result<DashboardView, Error> {
    let current_month = YearMonth::of(today);
    let summary = monthly_summary(transactions, current_month.year(), current_month.month());

    let recent_transactions = recent_activity(transactions, DEFAULT_RECENT_ACTIVITY_LIMIT)
        .into_iter()
        .map(|transaction| RecentTransaction {
            id: transaction.id,
            transaction_type: transaction.transaction_type,
            category: transaction.category.clone(),
            description: transaction.description.clone(),
            date: transaction.date,
            amount: transaction.amount,
            formatted_amount: format_signed_amount(
                transaction.transaction_type,
                transaction.amount,
            ),
        })
        .collect();

    Ok(DashboardView {
        username: username.to_owned(),
        period: format_period(current_month)?,
        year: current_month.year(),
        month: current_month.month() as u8,
        summary,
        total_income: format_currency(summary.income_total),
        total_expenses: format_currency(summary.expense_total),
        balance: format_currency(summary.balance),
        recent_transactions,
        transaction_count: transactions.len(),
        categories: CategoryOptions::default(),
        charts: build_charts(transactions)?,
    })
}

fn build_charts(transactions: &[Transaction]) -> Result<DashboardCharts, Error> {
    let totals = type_summary(transactions);
    let income_vs_expenses = ChartSeries {
        labels: vec!["Income".to_owned(), "Expenses".to_owned()],
        values: vec![totals.income.total, totals.expense.total],
    };

    let (labels, values) = category_breakdown(transactions)
        .into_iter()
        .map(|category| (category.category, category.total))
        .unzip();
    let expenses_by_category = ChartSeries { labels, values };

    let trends = monthly_trend(transactions);
    let monthly_trend = TrendChart {
        labels: trends
            .iter()
            .map(|trend| format_month_label(trend.month))
            .collect::<Result<_, _>>()?,
        income: trends.iter().map(|trend| trend.income_total).collect(),
        expenses: trends.iter().map(|trend| trend.expense_total).collect(),
    };

    Ok(DashboardCharts {
        income_vs_expenses,
        expenses_by_category,
        monthly_trend,
    })
}

/// Format `amount` as rupees with thousands separators, e.g. "₹1,234.50" or "-₹50.00".
pub fn format_currency(amount: Money) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter(CURRENCY_SYMBOL));

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt =
        NEGATIVE_FMT.get_or_init(|| currency_formatter(&format!("-{CURRENCY_SYMBOL}")));

    let number = amount.abs().cents() as f64 / 100.0;

    let formatted = if amount.cents() == 0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        Some(format!("{CURRENCY_SYMBOL}0.00"))
    } else if amount.is_negative() {
        negative_fmt.as_ref().map(|fmt| fmt.fmt_string(number))
    } else {
        positive_fmt.as_ref().map(|fmt| fmt.fmt_string(number))
    };

    match formatted {
        Some(formatted) => pad_cents(formatted),
        None => {
            let sign = if amount.is_negative() { "-" } else { "" };
            format!("{sign}{CURRENCY_SYMBOL}{}", amount.abs())
        }
    }
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .inspect_err(|error| tracing::error!("could not create currency formatter: {error:?}"))
        .ok()
        .map(|fmt| fmt.precision(Precision::Decimals(2)))
}

/// numfmt omits trailing zeros, so "12.30" is rendered as "12.3" and "12.00"
/// may be rendered as "12". Pad the fraction back out to two digits.
fn pad_cents(mut formatted: String) -> String {
    match formatted.rfind('.') {
        None => formatted.push_str(".00"),
        Some(point) if formatted.len() - point == 2 => formatted.push('0'),
        Some(_) => {}
    }

    formatted
}

/// Format a transaction amount with "+" for income and "-" for expenses.
pub fn format_signed_amount(transaction_type: TransactionType, amount: Money) -> String {
    let sign = match transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    format!("{sign}{}", format_currency(amount.abs()))
}

const PERIOD_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[month repr:long] [year]");
const MONTH_LABEL_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [year]");

/// Formats a month as its full name and year, e.g. "October 2026".
fn format_period(month: YearMonth) -> Result<String, Error> {
    format_month(month, PERIOD_FORMAT)
}

/// Formats a month as a three-letter abbreviation and year, e.g. "Jan 2024".
fn format_month_label(month: YearMonth) -> Result<String, Error> {
    format_month(month, MONTH_LABEL_FORMAT)
}

fn format_month(month: YearMonth, format: &[BorrowedFormatItem<'_>]) -> Result<String, Error> {
    Date::from_calendar_date(month.year(), month.month(), 1)
        .map_err(|error| Error::DateFormatError(error.to_string()))?
        .format(format)
        .map_err(|error| Error::DateFormatError(error.to_string()))
}
