//! HTTP handlers for the analytics endpoints.
//!
//! Each handler works out today's date in the configured timezone, loads the
//! transactions it needs while holding the database lock, and then summarises
//! them with the functions in [crate::analytics::aggregation].

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    analytics::{
        aggregation::{
            BudgetStatusEntry, CategoryTotal, MonthlyOverview, MonthlyTrend, TREND_MONTH_COUNT,
            budget_status, budget_window, category_breakdown, monthly_overview, monthly_trends,
        },
        period::{DateWindow, month_bounds, trailing_months},
    },
    budget::get_all_budgets,
    timezone::get_local_date,
    transaction::{Transaction, get_recent_transactions, get_transactions_in_date_range},
};

/// How many transactions are listed in the overview.
pub const RECENT_TRANSACTION_COUNT: u32 = 5;

/// The state needed by the analytics endpoints.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
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

/// The response body of the overview endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// Income and expense totals for the current month.
    pub overview: MonthlyOverview,
    /// This month's expenses per category, largest first.
    pub category_breakdown: Vec<CategoryTotal>,
    /// The most recently dated transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// Totals for the current month, a per-category breakdown of its expenses and
/// the latest transactions.
pub async fn get_overview_endpoint(
    State(state): State<AnalyticsState>,
) -> Result<Json<OverviewResponse>, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let month = month_bounds(today);

    let (transactions, recent_transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_transactions_in_date_range(month.as_range(), &connection)?,
            get_recent_transactions(RECENT_TRANSACTION_COUNT, &connection)?,
        )
    };

    Ok(Json(OverviewResponse {
        overview: monthly_overview(&transactions, today),
        category_breakdown: category_breakdown(&transactions, month),
        recent_transactions,
    }))
}

/// How much of each budget has been spent in its current period.
pub async fn get_budget_status_endpoint(
    State(state): State<AnalyticsState>,
) -> Result<Json<Vec<BudgetStatusEntry>>, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let (budgets, transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let budgets = get_all_budgets(&connection)?;
        let Some(window) = budgets
            .iter()
            .map(|budget| budget_window(budget, today))
            .reduce(DateWindow::union)
        else {
            return Ok(Json(Vec::new()));
        };

        let transactions = get_transactions_in_date_range(window.as_range(), &connection)?;
        (budgets, transactions)
    };

    let statuses = budgets
        .iter()
        .map(|budget| budget_status(budget, &transactions, today))
        .collect();

    Ok(Json(statuses))
}

/// Income, expenses and net income for each of the last six months, oldest first.
pub async fn get_trends_endpoint(
    State(state): State<AnalyticsState>,
) -> Result<Json<Vec<MonthlyTrend>>, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let months = trailing_months(today, TREND_MONTH_COUNT);
    let window = months
        .into_iter()
        .reduce(DateWindow::union)
        .unwrap_or_else(|| month_bounds(today));

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_date_range(window.as_range(), &connection)?
    };

    Ok(Json(monthly_trends(&transactions, today)))
}
