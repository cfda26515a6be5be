//! Budget listing and lookup endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{
        Budget,
        core::{get_all_budgets, get_budget},
    },
    database_id::BudgetId,
};

/// The state needed for reading budgets.
#[derive(Debug, Clone)]
pub struct BudgetListState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every budget, the most recently created first.
pub async fn get_budgets_endpoint(
    State(state): State<BudgetListState>,
) -> Result<Json<Vec<Budget>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_budgets(&connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))
        .map(Json)
}

/// Get a single budget, or 404 if it does not exist.
pub async fn get_budget_endpoint(
    State(state): State<BudgetListState>,
    path: Result<Path<BudgetId>, PathRejection>,
) -> Result<Json<Budget>, Error> {
    let Path(budget_id) = path?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budget(budget_id, &connection).map(Json)
}
