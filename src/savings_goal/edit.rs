//! Savings goal update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::{JsonRejection, PathRejection}},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::SavingsGoalId,
    savings_goal::{SavingsGoal, SavingsGoalBuilder, core::update_savings_goal},
};

/// The state needed for updating a savings goal.
#[derive(Debug, Clone)]
pub struct EditSavingsGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditSavingsGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace a savings goal. Omitted `current_amount` and `target_date` reset to their defaults.
pub async fn update_savings_goal_endpoint(
    State(state): State<EditSavingsGoalState>,
    path: Result<Path<SavingsGoalId>, PathRejection>,
    payload: Result<Json<SavingsGoalBuilder>, JsonRejection>,
) -> Result<Json<SavingsGoal>, Error> {
    let Path(goal_id) = path?;
    let Json(builder) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_savings_goal(goal_id, builder, &connection)
        .inspect_err(|error| tracing::debug!("Could not update savings goal {goal_id}: {error}"))
        .map(Json)
}
