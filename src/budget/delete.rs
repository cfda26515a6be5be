//! Budget deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, budget::core::delete_budget, database_id::BudgetId};

/// The state needed for deleting a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle budget deletion. Responds with 204 No Content, or 404 if the budget does not exist.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    path: Result<Path<BudgetId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(budget_id) = path?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_budget(budget_id, &connection) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(Error::DeleteMissingBudget) => Err(Error::DeleteMissingBudget),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting budget {budget_id}: {error}"
            );
            Err(error)
        }
    }
}
