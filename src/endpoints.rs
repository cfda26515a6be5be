//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/budgets/{budget_id}', use [format_endpoint].

/// Health check for load balancers and the SPA dev server.
pub const HEALTH: &str = "/api/health";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to get, update or delete a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to list and create savings goals.
pub const SAVINGS_GOALS: &str = "/api/savings-goals";
/// The route to get, update or delete a single savings goal.
pub const SAVINGS_GOAL: &str = "/api/savings-goals/{goal_id}";
/// The route for totals and average progress across all savings goals.
pub const SAVINGS_SUMMARY: &str = "/api/savings-goals/summary";
/// The route for the current month's totals, category breakdown and recent transactions.
pub const ANALYTICS_OVERVIEW: &str = "/api/analytics/overview";
/// The route for spending against each budget in the current period.
pub const ANALYTICS_BUDGET_STATUS: &str = "/api/analytics/budget-status";
/// The route for monthly income and expenses over the last six months.
pub const ANALYTICS_TRENDS: &str = "/api/analytics/trends";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/budgets/{budget_id}', '{budget_id}' is the parameter.
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
