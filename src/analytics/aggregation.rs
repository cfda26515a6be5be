//! Pure functions that summarise transactions for the analytics endpoints.
//!
//! Every function takes the transactions to summarise and the current date,
//! and filters the transactions to the relevant window itself. Callers may pass
//! a superset of the transactions needed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    analytics::period::{
        DateWindow, MonthKey, current_period_window, month_bounds, trailing_months,
    },
    budget::{Budget, BudgetPeriod},
    category::Category,
    database_id::BudgetId,
    transaction::{Transaction, TransactionType},
};

/// The number of months covered by [monthly_trends].
pub const TREND_MONTH_COUNT: usize = 6;

/// Income and expense totals for the current calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverview {
    /// The sum of income in the month.
    pub total_income: f64,
    /// The sum of expenses in the month.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net_income: f64,
    /// The month the totals cover, formatted as `YYYY-MM`.
    pub current_month: String,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category the expenses belong to.
    pub category: Category,
    /// The sum of the expenses.
    pub amount: f64,
}

/// How much of a budget has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Less than 80% used.
    Under,
    /// At least 80% but less than 100% used.
    Warning,
    /// 100% or more used.
    Over,
}

impl BudgetStatus {
    /// Classify a budget by how much of its limit has been spent.
    ///
    /// The amounts are compared directly, so spending exactly the limit is always
    /// [BudgetStatus::Over]. A budget with a zero limit is always [BudgetStatus::Under].
    pub fn from_amounts(spent_amount: f64, budget_amount: f64) -> Self {
        if budget_amount <= 0.0 {
            BudgetStatus::Under
        } else if spent_amount >= budget_amount {
            BudgetStatus::Over
        } else if spent_amount * 5.0 >= budget_amount * 4.0 {
            // At least 80% of the limit.
            BudgetStatus::Warning
        } else {
            BudgetStatus::Under
        }
    }
}

/// A budget alongside the spending counted against it in the current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatusEntry {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category of the budget.
    pub category: Category,
    /// How often the budget resets.
    pub period: BudgetPeriod,
    /// The budget's limit.
    pub budget_amount: f64,
    /// The sum of expenses in the category within the window.
    pub spent_amount: f64,
    /// The limit minus the amount spent, negative when overspent.
    pub remaining_amount: f64,
    /// The amount spent as a percentage of the limit.
    pub percentage_used: f64,
    /// The classification of `percentage_used`.
    pub status: BudgetStatus,
    /// The first day counted against the budget.
    pub window_start: Date,
    /// The last day counted against the budget.
    pub window_end: Date,
}

/// Income, expenses and net income for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// The month, formatted as `YYYY-MM`.
    pub month: String,
    /// The sum of income in the month.
    pub income: f64,
    /// The sum of expenses in the month.
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// Sums the amounts of `transactions` of the given type that fall inside `window`.
fn sum_in_window(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    window: DateWindow,
) -> f64 {
    transactions
        .iter()
        .filter(|transaction| {
            transaction.transaction_type == transaction_type && window.contains(transaction.date)
        })
        .fold(0.0, |total, transaction| total + transaction.amount)
}

/// Total income and expenses for the calendar month containing `today`.
pub fn monthly_overview(transactions: &[Transaction], today: Date) -> MonthlyOverview {
    let month = month_bounds(today);
    let total_income = sum_in_window(transactions, TransactionType::Income, month);
    let total_expenses = sum_in_window(transactions, TransactionType::Expense, month);

    MonthlyOverview {
        total_income,
        total_expenses,
        net_income: total_income - total_expenses,
        current_month: MonthKey::from(today).to_string(),
    }
}

/// Expenses inside `window` summed per category.
///
/// Ordered by amount, largest first. Categories with equal totals are ordered by name.
/// Categories without expenses are omitted.
pub fn category_breakdown(transactions: &[Transaction], window: DateWindow) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, f64> = HashMap::new();

    for transaction in transactions.iter().filter(|transaction| {
        transaction.transaction_type == TransactionType::Expense
            && window.contains(transaction.date)
    }) {
        *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal { category, amount })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    breakdown
}

/// The window of dates counted against `budget` on `today`.
///
/// This is the budget's current period, starting no earlier than the budget's start date.
/// If the budget starts after the current period, the window is empty and `start > end`.
pub fn budget_window(budget: &Budget, today: Date) -> DateWindow {
    let period = current_period_window(budget.period, today);

    DateWindow {
        start: period.start.max(budget.start_date),
        end: period.end,
    }
}

/// Spent amount as a percentage of `budget_amount`, zero for a zero budget.
///
/// Spending at or above the limit is never reported below 100.
pub fn percentage_used(spent_amount: f64, budget_amount: f64) -> f64 {
    if budget_amount <= 0.0 {
        0.0
    } else if spent_amount >= budget_amount {
        (spent_amount * 100.0 / budget_amount).max(100.0)
    } else {
        spent_amount * 100.0 / budget_amount
    }
}

/// Compare the expenses in `budget`'s category and window against its limit.
pub fn budget_status(
    budget: &Budget,
    transactions: &[Transaction],
    today: Date,
) -> BudgetStatusEntry {
    let window = budget_window(budget, today);
    let spent_amount = transactions
        .iter()
        .filter(|transaction| {
            transaction.transaction_type == TransactionType::Expense
                && transaction.category == budget.category
                && window.contains(transaction.date)
        })
        .fold(0.0, |total, transaction| total + transaction.amount);
    let percentage_used = percentage_used(spent_amount, budget.amount);

    BudgetStatusEntry {
        id: budget.id,
        category: budget.category,
        period: budget.period,
        budget_amount: budget.amount,
        spent_amount,
        remaining_amount: budget.amount - spent_amount,
        percentage_used,
        status: BudgetStatus::from_amounts(spent_amount, budget.amount),
        window_start: window.start,
        window_end: window.end,
    }
}

/// Income, expenses and net income for the [TREND_MONTH_COUNT] months ending with
/// the month containing `today`, oldest first.
///
/// Months without transactions are included with zero totals.
pub fn monthly_trends(transactions: &[Transaction], today: Date) -> Vec<MonthlyTrend> {
    trailing_months(today, TREND_MONTH_COUNT)
        .into_iter()
        .map(|month| {
            let income = sum_in_window(transactions, TransactionType::Income, month);
            let expenses = sum_in_window(transactions, TransactionType::Expense, month);

            MonthlyTrend {
                month: MonthKey::from(month.start).to_string(),
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{
        Date,
        macros::{date, datetime},
    };

    use crate::{
        analytics::period::month_bounds,
        budget::{Budget, BudgetPeriod},
        category::Category,
        transaction::{Transaction, TransactionType},
    };

    use super::{
        BudgetStatus, CategoryTotal, budget_status, category_breakdown, monthly_overview,
        monthly_trends, percentage_used,
    };

    fn transaction(
        amount: f64,
        category: Category,
        transaction_type: TransactionType,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            description: "test".to_owned(),
            amount,
            category,
            transaction_type,
            date,
            created_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    fn expense(amount: f64, category: Category, date: Date) -> Transaction {
        transaction(amount, category, TransactionType::Expense, date)
    }

    fn income(amount: f64, date: Date) -> Transaction {
        transaction(amount, Category::Other, TransactionType::Income, date)
    }

    fn budget(category: Category, amount: f64, period: BudgetPeriod, start_date: Date) -> Budget {
        Budget {
            id: 1,
            category,
            amount,
            period,
            start_date,
            created_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn overview_only_counts_current_month() {
        let transactions = [
            income(3000.0, date!(2024 - 03 - 01)),
            expense(120.0, Category::Housing, date!(2024 - 03 - 31)),
            expense(80.0, Category::Travel, date!(2024 - 02 - 29)),
            income(500.0, date!(2024 - 04 - 01)),
        ];

        let overview = monthly_overview(&transactions, date!(2024 - 03 - 15));

        assert_eq!(overview.total_income, 3000.0);
        assert_eq!(overview.total_expenses, 120.0);
        assert_eq!(overview.net_income, 2880.0);
        assert_eq!(overview.current_month, "2024-03");
    }

    #[test]
    fn overview_of_empty_month_is_zero() {
        let overview = monthly_overview(&[], date!(2024 - 03 - 15));

        assert_eq!(overview.total_income, 0.0);
        assert_eq!(overview.total_expenses, 0.0);
        assert_eq!(overview.net_income, 0.0);
    }

    #[test]
    fn breakdown_sums_expenses_per_category_largest_first() {
        let march = month_bounds(date!(2024 - 03 - 01));
        let transactions = [
            expense(4.5, Category::FoodAndDining, date!(2024 - 03 - 01)),
            expense(10.0, Category::FoodAndDining, date!(2024 - 03 - 02)),
            expense(50.0, Category::Transportation, date!(2024 - 03 - 03)),
            income(1000.0, date!(2024 - 03 - 04)),
            expense(999.0, Category::Shopping, date!(2024 - 04 - 01)),
        ];

        let breakdown = category_breakdown(&transactions, march);

        assert_eq!(
            breakdown,
            vec![
                CategoryTotal {
                    category: Category::Transportation,
                    amount: 50.0,
                },
                CategoryTotal {
                    category: Category::FoodAndDining,
                    amount: 14.5,
                },
            ]
        );
    }

    #[test]
    fn breakdown_orders_ties_by_category_name() {
        let march = month_bounds(date!(2024 - 03 - 01));
        let transactions = [
            expense(5.0, Category::Utilities, date!(2024 - 03 - 01)),
            expense(5.0, Category::Entertainment, date!(2024 - 03 - 01)),
        ];

        let breakdown = category_breakdown(&transactions, march);

        assert_eq!(breakdown[0].category, Category::Entertainment);
        assert_eq!(breakdown[1].category, Category::Utilities);
    }

    #[test]
    fn breakdown_total_matches_expense_total() {
        let today = date!(2024 - 03 - 20);
        let transactions = [
            expense(12.25, Category::Healthcare, date!(2024 - 03 - 02)),
            expense(7.75, Category::Education, date!(2024 - 03 - 09)),
            expense(30.0, Category::Healthcare, date!(2024 - 03 - 19)),
        ];

        let breakdown_total: f64 = category_breakdown(&transactions, month_bounds(today))
            .iter()
            .map(|total| total.amount)
            .sum();

        assert_eq!(
            breakdown_total,
            monthly_overview(&transactions, today).total_expenses
        );
    }

    #[test]
    fn budget_at_85_percent_is_warning() {
        let budget = budget(
            Category::FoodAndDining,
            100.0,
            BudgetPeriod::Monthly,
            date!(2024 - 01 - 01),
        );
        let transactions = [
            expense(50.0, Category::FoodAndDining, date!(2024 - 03 - 02)),
            expense(35.0, Category::FoodAndDining, date!(2024 - 03 - 10)),
            expense(40.0, Category::Shopping, date!(2024 - 03 - 10)),
        ];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 15));

        assert_eq!(status.spent_amount, 85.0);
        assert_eq!(status.remaining_amount, 15.0);
        assert_eq!(status.percentage_used, 85.0);
        assert_eq!(status.status, BudgetStatus::Warning);
    }

    #[test]
    fn budget_spent_exactly_is_over_at_one_hundred_percent() {
        let budget = budget(
            Category::Entertainment,
            60.0,
            BudgetPeriod::Weekly,
            date!(2024 - 01 - 01),
        );
        let transactions = [expense(60.0, Category::Entertainment, date!(2024 - 03 - 12))];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 14));

        assert_eq!(status.percentage_used, 100.0);
        assert_eq!(status.status, BudgetStatus::Over);
        assert_eq!(status.remaining_amount, 0.0);
    }

    #[test]
    fn overspent_budget_has_negative_remaining() {
        let budget = budget(
            Category::Shopping,
            100.0,
            BudgetPeriod::Yearly,
            date!(2024 - 01 - 01),
        );
        let transactions = [
            expense(90.0, Category::Shopping, date!(2024 - 02 - 01)),
            expense(60.0, Category::Shopping, date!(2024 - 11 - 01)),
        ];

        let status = budget_status(&budget, &transactions, date!(2024 - 06 - 01));

        assert_eq!(status.spent_amount, 150.0);
        assert_eq!(status.remaining_amount, -50.0);
        assert_eq!(status.status, BudgetStatus::Over);
    }

    #[test]
    fn weekly_budget_ignores_expenses_outside_week() {
        let budget = budget(
            Category::Transportation,
            50.0,
            BudgetPeriod::Weekly,
            date!(2024 - 01 - 01),
        );
        let transactions = [
            expense(10.0, Category::Transportation, date!(2024 - 03 - 10)),
            expense(20.0, Category::Transportation, date!(2024 - 03 - 11)),
            expense(30.0, Category::Transportation, date!(2024 - 03 - 18)),
        ];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 14));

        assert_eq!(status.spent_amount, 20.0);
        assert_eq!(status.window_start, date!(2024 - 03 - 11));
        assert_eq!(status.window_end, date!(2024 - 03 - 17));
        assert_eq!(status.status, BudgetStatus::Under);
    }

    #[test]
    fn budget_ignores_expenses_before_start_date() {
        let budget = budget(
            Category::Utilities,
            200.0,
            BudgetPeriod::Monthly,
            date!(2024 - 03 - 10),
        );
        let transactions = [
            expense(100.0, Category::Utilities, date!(2024 - 03 - 05)),
            expense(40.0, Category::Utilities, date!(2024 - 03 - 10)),
        ];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 20));

        assert_eq!(status.spent_amount, 40.0);
        assert_eq!(status.window_start, date!(2024 - 03 - 10));
        assert_eq!(status.percentage_used, 20.0);
    }

    #[test]
    fn zero_budget_has_zero_percentage() {
        let budget = budget(Category::Other, 0.0, BudgetPeriod::Monthly, date!(2024 - 01 - 01));
        let transactions = [expense(10.0, Category::Other, date!(2024 - 03 - 05))];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 20));

        assert_eq!(status.percentage_used, 0.0);
        assert_eq!(status.status, BudgetStatus::Under);
        assert_eq!(status.remaining_amount, -10.0);
    }

    #[test]
    fn percentage_used_grows_with_spending() {
        let percentages: Vec<f64> = [0.0, 25.0, 79.99, 80.0, 100.0, 140.0]
            .iter()
            .map(|&spent| percentage_used(spent, 100.0))
            .collect();

        assert!(percentages.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(percentage_used(37.5, 37.5), 100.0);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(BudgetStatus::from_amounts(79.99, 100.0), BudgetStatus::Under);
        assert_eq!(BudgetStatus::from_amounts(80.0, 100.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::from_amounts(99.99, 100.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::from_amounts(100.0, 100.0), BudgetStatus::Over);
        assert_eq!(BudgetStatus::from_amounts(5.0, 0.0), BudgetStatus::Under);
    }

    #[test]
    fn spending_exactly_an_uneven_limit_is_one_hundred_percent() {
        let budget = budget(
            Category::Housing,
            11148.37,
            BudgetPeriod::Monthly,
            date!(2024 - 01 - 01),
        );
        let transactions = [expense(11148.37, Category::Housing, date!(2024 - 03 - 05))];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 20));

        assert_eq!(status.spent_amount, 11148.37);
        assert_eq!(status.percentage_used, 100.0);
        assert_eq!(status.status, BudgetStatus::Over);
    }

    #[test]
    fn two_decimal_limits_spent_exactly_are_over() {
        for cents in (1..2_000_000).step_by(7919) {
            let limit = cents as f64 / 100.0;

            assert_eq!(percentage_used(limit, limit), 100.0, "limit {limit}");
            assert_eq!(
                BudgetStatus::from_amounts(limit, limit),
                BudgetStatus::Over,
                "limit {limit}"
            );
        }
    }

    #[test]
    fn empty_windows_sum_to_positive_zero() {
        let today = date!(2024 - 03 - 15);
        let budget = budget(Category::Travel, 500.0, BudgetPeriod::Monthly, date!(2024 - 01 - 01));

        let overview = monthly_overview(&[], today);
        let status = budget_status(&budget, &[], today);
        let trends = monthly_trends(&[], today);

        assert!(overview.total_income.is_sign_positive());
        assert!(overview.total_expenses.is_sign_positive());
        assert!(status.spent_amount.is_sign_positive());
        assert!(status.percentage_used.is_sign_positive());
        assert!(trends.iter().all(|trend| {
            trend.income.is_sign_positive() && trend.expenses.is_sign_positive()
        }));
    }

    #[test]
    fn budget_starting_after_current_period_has_empty_window() {
        let budget = budget(
            Category::Education,
            300.0,
            BudgetPeriod::Monthly,
            date!(2024 - 05 - 01),
        );
        let transactions = [expense(120.0, Category::Education, date!(2024 - 03 - 10))];

        let status = budget_status(&budget, &transactions, date!(2024 - 03 - 14));

        assert_eq!(status.window_start, date!(2024 - 05 - 01));
        assert_eq!(status.window_end, date!(2024 - 03 - 31));
        assert_eq!(status.spent_amount, 0.0);
        assert_eq!(status.remaining_amount, 300.0);
        assert_eq!(status.status, BudgetStatus::Under);
    }

    #[test]
    fn trends_have_six_increasing_months_with_zeros_for_gaps() {
        let transactions = [
            income(2000.0, date!(2024 - 03 - 01)),
            expense(500.0, Category::Housing, date!(2024 - 03 - 05)),
            expense(25.0, Category::Travel, date!(2023 - 11 - 30)),
            income(999.0, date!(2023 - 09 - 30)),
        ];

        let trends = monthly_trends(&transactions, date!(2024 - 03 - 15));

        let months: Vec<&str> = trends.iter().map(|trend| trend.month.as_str()).collect();
        assert_eq!(
            months,
            ["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]
        );
        assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(trends[1].expenses, 25.0);
        assert_eq!(trends[1].net, -25.0);
        assert_eq!(trends[3].income, 0.0);
        assert_eq!(trends[5].income, 2000.0);
        assert_eq!(trends[5].net, 1500.0);
    }
}
