//! Savings goal creation endpoint.

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
    savings_goal::{SavingsGoalBuilder, core::create_savings_goal},
};

/// The state needed for creating a savings goal.
#[derive(Debug, Clone)]
pub struct CreateSavingsGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSavingsGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle savings goal creation. Responds with the new goal, its `Location` and 201 Created.
pub async fn create_savings_goal_endpoint(
    State(state): State<CreateSavingsGoalState>,
    payload: Result<Json<SavingsGoalBuilder>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(builder) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = create_savings_goal(builder, &connection)
        .inspect_err(|error| tracing::debug!("Could not create savings goal: {error}"))?;

    tracing::info!("Created savings goal {} \"{}\"", goal.id, goal.name);

    let location = format_endpoint(endpoints::SAVINGS_GOAL, goal.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(goal)))
}
