//! Defines the endpoints for listing transactions and fetching a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
// axum_extra's Query treats `?type=` as `None` instead of failing to parse an empty string.
use axum_extra::extract::{Query, QueryRejection};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        Transaction,
        core::{TransactionQuery, get_transaction, get_transactions},
    },
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing transactions, newest first.
///
/// The optional query parameters `type`, `category`, `start_date` and `end_date`
/// narrow down the results. Empty parameters are ignored.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionListState>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Query(query) = query.map_err(|rejection| Error::InvalidQuery(rejection.to_string()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&query, &connection)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;

    Ok(Json(transactions))
}

/// A route handler for getting a transaction by its database ID.
///
/// Responds with the status code 404 if the transaction does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionListState>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = path?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(transaction_id, &connection).map(Json)
}
