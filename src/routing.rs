//! Application router configuration.

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    analytics::{get_budget_status_endpoint, get_overview_endpoint, get_trends_endpoint},
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint, get_budgets_endpoint,
        update_budget_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    savings_goal::{
        create_savings_goal_endpoint, delete_savings_goal_endpoint, get_savings_goal_endpoint,
        get_savings_goals_endpoint, get_savings_summary_endpoint, update_savings_goal_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(
            endpoints::SAVINGS_GOALS,
            get(get_savings_goals_endpoint).post(create_savings_goal_endpoint),
        )
        .route(endpoints::SAVINGS_SUMMARY, get(get_savings_summary_endpoint))
        .route(
            endpoints::SAVINGS_GOAL,
            get(get_savings_goal_endpoint)
                .put(update_savings_goal_endpoint)
                .delete(delete_savings_goal_endpoint),
        )
        .route(endpoints::ANALYTICS_OVERVIEW, get(get_overview_endpoint))
        .route(
            endpoints::ANALYTICS_BUDGET_STATUS,
            get(get_budget_status_endpoint),
        )
        .route(endpoints::ANALYTICS_TRENDS, get(get_trends_endpoint))
        .fallback(get_404_not_found)
        .layer(cors)
        .with_state(state)
}

/// The response body of the health check.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Always "ok" while the server is accepting requests.
    pub status: String,
}

async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_owned(),
    })
}
