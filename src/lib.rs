//! Finance Tracker is a REST API for tracking personal finances.
//!
//! It stores transactions, budgets and savings goals in a SQLite database and
//! serves JSON endpoints for managing them, along with analytics endpoints for
//! monthly overviews, budget status and income/expense trends.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod analytics;
mod app_state;
mod budget;
mod category;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod routing;
mod savings_goal;
mod timezone;
mod transaction;

pub use analytics::{
    BudgetStatus, BudgetStatusEntry, CategoryTotal, MonthlyOverview, MonthlyTrend,
    OverviewResponse,
};
pub use app_state::AppState;
pub use budget::{Budget, BudgetBuilder, BudgetPeriod, create_budget};
pub use category::Category;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use savings_goal::{SavingsGoal, SavingsGoalBuilder, SavingsSummary, create_savings_goal};
pub use transaction::{Transaction, TransactionBuilder, TransactionType, create_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed, e.g. malformed JSON, a missing
    /// field, an unknown enum variant or a badly formatted date.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The query string could not be parsed.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A path parameter could not be parsed, e.g. a non-numeric ID.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A monetary amount was below zero.
    ///
    /// Amounts are always stored as non-negative values, the direction of the
    /// money (income vs. expense) is given by the transaction type.
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    /// A monetary amount was NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFiniteAmount(&'static str),

    /// A monetary amount was larger than [MAX_AMOUNT].
    #[error("{0} must not be more than 1000000000000")]
    AmountTooLarge(&'static str),

    /// A transaction was given a blank description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A savings goal was given a blank name.
    #[error("savings goal name cannot be empty")]
    EmptyGoalName,

    /// The string does not name one of the fixed categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update a savings goal that does not exist
    #[error("tried to update a savings goal that is not in the database")]
    UpdateMissingSavingsGoal,

    /// Tried to delete a savings goal that does not exist
    #[error("tried to delete a savings goal that is not in the database")]
    DeleteMissingSavingsGoal,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPath(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// A message describing what went wrong.
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidRequestBody(_)
            | Error::InvalidQuery(_)
            | Error::InvalidPath(_)
            | Error::NegativeAmount(_)
            | Error::NonFiniteAmount(_)
            | Error::AmountTooLarge(_)
            | Error::EmptyDescription
            | Error::EmptyGoalName
            | Error::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget
            | Error::UpdateMissingSavingsGoal
            | Error::DeleteMissingSavingsGoal => StatusCode::NOT_FOUND,
            Error::InvalidTimezoneError(timezone) => {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                );
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                );
            }
        };

        error_response(status, self.to_string())
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

/// The largest monetary amount that can be stored.
///
/// Amounts up to this size, and sums of millions of them, keep cent precision in an `f64`.
pub const MAX_AMOUNT: f64 = 1e12;

/// Check that a monetary amount can be stored.
///
/// `field` names the amount in the error message, e.g. "amount" or "target_amount".
/// Negative zero is stored as zero.
///
/// # Errors
/// Returns [Error::NonFiniteAmount] for NaN or infinite values,
/// [Error::NegativeAmount] for values below zero and
/// [Error::AmountTooLarge] for values above [MAX_AMOUNT].
pub(crate) fn validate_amount(amount: f64, field: &'static str) -> Result<f64, Error> {
    if !amount.is_finite() {
        Err(Error::NonFiniteAmount(field))
    } else if amount < 0.0 {
        Err(Error::NegativeAmount(field))
    } else if amount > MAX_AMOUNT {
        Err(Error::AmountTooLarge(field))
    } else if amount == 0.0 {
        Ok(0.0)
    } else {
        Ok(amount)
    }
}
