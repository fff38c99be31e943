//! Transaction aggregation for summaries, category breakdowns and trends.
//!
//! Every function here is pure: it takes a snapshot of one user's
//! transactions and never touches the database. Sums are exact since
//! amounts are whole numbers of cents.

use std::{cmp::Ordering, collections::HashMap, fmt::Display};

use serde::{Serialize, Serializer};
use time::{Date, Month};

use crate::{
    money::Money,
    transaction::{Transaction, TransactionType},
};

/// The number of transactions shown as recent activity when no limit is given.
pub const DEFAULT_RECENT_ACTIVITY_LIMIT: usize = 5;

/// A calendar month, serialized as "YYYY-MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a year-month pair.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the year.
    pub fn month(&self) -> Month {
        self.month
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month as u8).cmp(&(other.year, other.month as u8))
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The income and expense totals of one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// The sum of income in the month.
    pub income_total: Money,
    /// The sum of expenses in the month.
    pub expense_total: Money,
    /// Income minus expenses, negative when more was spent than earned.
    pub balance: Money,
}

/// The sum and number of transactions of one type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotal {
    /// The sum of the amounts.
    pub total: Money,
    /// The number of transactions.
    pub count: usize,
}

/// The totals of all income and all expenses.
///
/// Both types are always present, zero-filled when there are no
/// transactions of that type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    /// The totals over all income.
    pub income: TypeTotal,
    /// The totals over all expenses.
    pub expense: TypeTotal,
}

/// The total spent in one expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// The name of the category.
    pub category: String,
    /// The sum of the expenses in the category.
    pub total: Money,
    /// The number of expenses in the category.
    pub count: usize,
}

/// The income and expense totals of a month that has transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    /// The month the totals are for.
    pub month: YearMonth,
    /// The sum of income in the month.
    pub income_total: Money,
    /// The sum of expenses in the month.
    pub expense_total: Money,
}

/// The total of one transaction type in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    /// The month the total is for.
    pub month: YearMonth,
    /// Whether the total is income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The sum of the transactions.
    pub total: Money,
}

/// Sum the income and expenses dated within `month` of `year`.
pub fn monthly_summary(transactions: &[Transaction], year: i32, month: Month) -> MonthlySummary {
    let period = YearMonth::new(year, month);
    let mut income_total = Money::ZERO;
    let mut expense_total = Money::ZERO;

    for transaction in transactions
        .iter()
        .filter(|transaction| period.contains(transaction.date))
    {
        match transaction.transaction_type {
            TransactionType::Income => income_total += transaction.amount,
            TransactionType::Expense => expense_total += transaction.amount,
        }
    }

    MonthlySummary {
        income_total,
        expense_total,
        balance: income_total - expense_total,
    }
}

/// Sum and count all of the income and all of the expenses.
pub fn type_summary(transactions: &[Transaction]) -> TypeSummary {
    let mut summary = TypeSummary::default();

    for transaction in transactions {
        let type_total = match transaction.transaction_type {
            TransactionType::Income => &mut summary.income,
            TransactionType::Expense => &mut summary.expense,
        };

        type_total.total += transaction.amount;
        type_total.count += 1;
    }

    summary
}

/// Group expenses by category, largest total first.
///
/// Income is ignored. Categories with equal totals keep the order in which
/// they first appear in `transactions`.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
    {
        let index = *index_by_category
            .entry(transaction.category.as_str())
            .or_insert_with(|| {
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    total: Money::ZERO,
                    count: 0,
                });
                totals.len() - 1
            });

        totals[index].total += transaction.amount;
        totals[index].count += 1;
    }

    // `sort_by` is stable, so ties keep their first-seen order.
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Sum income and expenses per month, oldest month first.
///
/// Only months with at least one transaction are included.
pub fn monthly_trend(transactions: &[Transaction]) -> Vec<MonthlyTrend> {
    let mut totals: HashMap<YearMonth, MonthlyTrend> = HashMap::new();

    for transaction in transactions {
        let month = YearMonth::of(transaction.date);
        let trend = totals.entry(month).or_insert(MonthlyTrend {
            month,
            income_total: Money::ZERO,
            expense_total: Money::ZERO,
        });

        match transaction.transaction_type {
            TransactionType::Income => trend.income_total += transaction.amount,
            TransactionType::Expense => trend.expense_total += transaction.amount,
        }
    }

    let mut trends: Vec<MonthlyTrend> = totals.into_values().collect();
    trends.sort_by_key(|trend| trend.month);
    trends
}

/// Flatten a monthly trend into one row per month and transaction type.
///
/// Rows are ordered by month, with income before expenses. A type with no
/// transactions in a month has no row. Amounts are strictly positive, so a
/// zero total means there were no transactions of that type.
pub fn trend_rows(trends: &[MonthlyTrend]) -> Vec<TrendRow> {
    trends
        .iter()
        .flat_map(|trend| {
            [
                (TransactionType::Income, trend.income_total),
                (TransactionType::Expense, trend.expense_total),
            ]
            .into_iter()
            .filter(|(_, total)| *total > Money::ZERO)
            .map(|(transaction_type, total)| TrendRow {
                month: trend.month,
                transaction_type,
                total,
            })
        })
        .collect()
}

/// The `limit` most recently recorded transactions, most recent first.
///
/// Recency is by insertion order (the transaction ID), not by the date of
/// the transaction, so a backdated transaction that was just entered still
/// shows up first.
pub fn recent_activity(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut recent: Vec<&Transaction> = transactions.iter().collect();
    recent.sort_by(|a, b| b.id.cmp(&a.id));
    recent.truncate(limit);
    recent
}
