//! Analytics computed from transactions and budgets on every request.
//!
//! Covers the monthly overview, the status of each budget in its current period,
//! and income/expense trends over recent months.

mod aggregation;
mod handlers;
mod period;

pub use aggregation::{
    BudgetStatus, BudgetStatusEntry, CategoryTotal, MonthlyOverview, MonthlyTrend,
};
pub use handlers::{
    OverviewResponse, get_budget_status_endpoint, get_overview_endpoint, get_trends_endpoint,
};
