//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - JSON endpoints for listing, creating, updating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction, create_transaction_table,
    get_recent_transactions, get_transactions_in_date_range,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use list_endpoint::{get_transaction_endpoint, get_transactions_endpoint};

#[cfg(test)]
pub use core::{
    TransactionQuery, count_transactions, delete_transaction, get_transaction, get_transactions,
    update_transaction,
};
