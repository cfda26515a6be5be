//! Savings goal deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::SavingsGoalId, savings_goal::core::delete_savings_goal,
};

/// The state needed for deleting a savings goal.
#[derive(Debug, Clone)]
pub struct DeleteSavingsGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteSavingsGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle savings goal deletion. Responds with 204 No Content, or 404 if the goal does not exist.
pub async fn delete_savings_goal_endpoint(
    State(state): State<DeleteSavingsGoalState>,
    path: Result<Path<SavingsGoalId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(goal_id) = path?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_savings_goal(goal_id, &connection)
        .inspect(|_| tracing::info!("Deleted savings goal {goal_id}"))
        .map(|_| StatusCode::NO_CONTENT)
}
