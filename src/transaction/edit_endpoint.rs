//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::{JsonRejection, PathRejection}},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{Transaction, core::update_transaction, create_endpoint::TransactionForm},
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the fields of a transaction.
///
/// The request body has the same shape as the body for creating a transaction.
/// Sending the same body twice leaves the transaction in the same state.
pub async fn update_transaction_endpoint(
    State(state): State<EditTransactionState>,
    path: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = path?;
    let Json(form) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = update_transaction(transaction_id, form.into(), &connection)
        .inspect_err(|error| {
            tracing::debug!("Could not update transaction {transaction_id}: {error}")
        })?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Category, Error,
        db::initialize,
        transaction::{
            Transaction, TransactionType, create_endpoint::TransactionForm, create_transaction,
            edit_endpoint::EditTransactionState, update_transaction_endpoint,
        },
    };

    fn get_test_state() -> EditTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn rent_form() -> TransactionForm {
        TransactionForm {
            description: "Rent".to_owned(),
            amount: 450.0,
            category: Category::Housing,
            transaction_type: TransactionType::Expense,
            date: date!(2024 - 03 - 04),
        }
    }

    #[tokio::test]
    async fn updates_transaction() {
        let state = get_test_state();
        let created = create_transaction(
            Transaction::build(400.0, date!(2024 - 03 - 01), "Rnet"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let Json(updated) =
            update_transaction_endpoint(State(state), Ok(Path(created.id)), Ok(Json(rent_form())))
                .await
                .expect("could not update transaction");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, "Rent");
        assert_eq!(updated.amount, 450.0);
        assert_eq!(updated.category, Category::Housing);
        assert_eq!(updated.date, date!(2024 - 03 - 04));
    }

    #[tokio::test]
    async fn update_missing_transaction_is_an_error() {
        let state = get_test_state();

        let result =
            update_transaction_endpoint(State(state), Ok(Path(3)), Ok(Json(rent_form()))).await;

        assert_eq!(result.map(|json| json.0), Err(Error::UpdateMissingTransaction));
    }
}
