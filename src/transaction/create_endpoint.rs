//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    category::Category,
    endpoints::{self, format_endpoint},
    transaction::{Transaction, TransactionBuilder, TransactionType, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating or updating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The non-negative value of the transaction in dollars.
    pub amount: f64,
    /// What the transaction was for.
    pub category: Category,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The date when the transaction ocurred.
    pub date: Date,
}

impl From<TransactionForm> for TransactionBuilder {
    fn from(form: TransactionForm) -> Self {
        Transaction::build(form.amount, form.date, &form.description)
            .category(form.category)
            .transaction_type(form.transaction_type)
    }
}

/// A route handler for creating a new transaction, responds with the created
/// transaction, the status code 201 and a `Location` header pointing to it.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(form) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(form.into(), &connection)
        .inspect_err(|error| tracing::debug!("Could not create transaction: {error}"))?;

    tracing::info!("Created transaction {}", transaction.id);

    let location = format_endpoint(endpoints::TRANSACTION, transaction.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)))
}
