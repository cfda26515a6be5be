//! Savings goal listing, lookup and summary endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::SavingsGoalId,
    savings_goal::{
        SavingsGoal, SavingsSummary,
        core::{get_all_savings_goals, get_savings_goal, summarise_goals},
    },
};

/// The state needed for reading savings goals.
#[derive(Debug, Clone)]
pub struct SavingsGoalListState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsGoalListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every savings goal, the most recently created first.
pub async fn get_savings_goals_endpoint(
    State(state): State<SavingsGoalListState>,
) -> Result<Json<Vec<SavingsGoal>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_savings_goals(&connection)
        .inspect_err(|error| tracing::error!("could not get savings goals: {error}"))
        .map(Json)
}

/// Get a single savings goal, or 404 if it does not exist.
pub async fn get_savings_goal_endpoint(
    State(state): State<SavingsGoalListState>,
    path: Result<Path<SavingsGoalId>, PathRejection>,
) -> Result<Json<SavingsGoal>, Error> {
    let Path(goal_id) = path?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_savings_goal(goal_id, &connection).map(Json)
}

/// Total saved, total targeted and average progress across all savings goals.
pub async fn get_savings_summary_endpoint(
    State(state): State<SavingsGoalListState>,
) -> Result<Json<SavingsSummary>, Error> {
    let goals = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_savings_goals(&connection)?
    };

    Ok(Json(summarise_goals(&goals)))
}
