//! Budget creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    budget::{BudgetBuilder, core::create_budget},
};

/// The state needed for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle budget creation. Responds with the new budget, its `Location` and 201 Created.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    payload: Result<Json<BudgetBuilder>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(builder) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = create_budget(builder, &connection)
        .inspect_err(|error| tracing::debug!("Could not create budget: {error}"))?;

    tracing::info!(
        "Created {:?} budget {} for {}",
        budget.period,
        budget.id,
        budget.category
    );

    let location = format_endpoint(endpoints::BUDGET, budget.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(budget)))
}
