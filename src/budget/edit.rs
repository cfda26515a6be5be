//! Budget update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::{JsonRejection, PathRejection}},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{Budget, BudgetBuilder, core::update_budget},
    database_id::BudgetId,
};

/// The state needed for updating a budget.
#[derive(Debug, Clone)]
pub struct EditBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace a budget's category, limit, period and start date.
pub async fn update_budget_endpoint(
    State(state): State<EditBudgetState>,
    path: Result<Path<BudgetId>, PathRejection>,
    payload: Result<Json<BudgetBuilder>, JsonRejection>,
) -> Result<Json<Budget>, Error> {
    let Path(budget_id) = path?;
    let Json(builder) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_budget(budget_id, builder, &connection)
        .inspect_err(|error| tracing::debug!("Could not update budget {budget_id}: {error}"))
        .map(Json)
}
