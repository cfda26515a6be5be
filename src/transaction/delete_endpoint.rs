use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with 204 No Content on success.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(transaction_id) = path?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(Error::DeleteMissingTransaction) => Err(Error::DeleteMissingTransaction),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Err(error)
        }
    }
}
