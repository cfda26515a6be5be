//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, budget::create_budget_table, savings_goal::create_savings_goal_table,
    transaction::create_transaction_table,
};

/// Create the tables for all domain models if they do not already exist.
///
/// The tables are created inside a single exclusive transaction, so either all
/// of them are created or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_savings_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
