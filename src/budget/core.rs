//! Defines the core data models and database queries for budgets.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, category::Category, database_id::BudgetId, validate_amount};

// ============================================================================
// MODELS
// ============================================================================

/// How often a budget's limit resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Monday to Sunday.
    Weekly,
    /// The first to the last day of a calendar month.
    Monthly,
    /// January 1st to December 31st.
    Yearly,
}

impl BudgetPeriod {
    fn as_str(self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(FromSqlError::Other(
                format!("invalid budget period \"{other}\"").into(),
            )),
        }
    }
}

/// A spending limit for a category over a recurring period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category of expenses counted against this budget.
    pub category: Category,
    /// The most that should be spent in one period.
    pub amount: f64,
    /// How often the limit resets.
    pub period: BudgetPeriod,
    /// Expenses before this date are not counted against the budget.
    pub start_date: Date,
    /// When the budget was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Budget {
    /// Create a new budget.
    ///
    /// Shortcut for [BudgetBuilder] for discoverability.
    pub fn build(
        category: Category,
        amount: f64,
        period: BudgetPeriod,
        start_date: Date,
    ) -> BudgetBuilder {
        BudgetBuilder {
            category,
            amount,
            period,
            start_date,
        }
    }
}

/// The fields needed to create or update a [Budget].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetBuilder {
    /// The category of expenses counted against this budget.
    pub category: Category,
    /// The non-negative spending limit.
    pub amount: f64,
    /// How often the limit resets.
    pub period: BudgetPeriod,
    /// Expenses before this date are not counted against the budget.
    pub start_date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, category, amount, period, start_date, created_at";

/// Create a new budget in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount], [Error::NonFiniteAmount] or [Error::AmountTooLarge] if the
///   amount cannot be stored,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(builder: BudgetBuilder, connection: &Connection) -> Result<Budget, Error> {
    let amount = validate_amount(builder.amount, "amount")?;

    let budget = connection
        .prepare(&format!(
            "INSERT INTO budget (category, amount, period, start_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.category,
                amount,
                builder.period,
                builder.start_date,
                OffsetDateTime::now_utc(),
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve a budget by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM budget WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// Retrieve all budgets, the most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_budgets(connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM budget ORDER BY id DESC"
        ))?
        .query_map([], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the budget `id` with the fields in `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBudget] if `id` does not refer to a valid budget,
/// - [Error::NegativeAmount], [Error::NonFiniteAmount] or [Error::AmountTooLarge] if the
///   amount cannot be stored,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    builder: BudgetBuilder,
    connection: &Connection,
) -> Result<Budget, Error> {
    let amount = validate_amount(builder.amount, "amount")?;

    connection
        .prepare(&format!(
            "UPDATE budget SET category = ?1, amount = ?2, period = ?3, start_date = ?4
             WHERE id = ?5
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.category,
                amount,
                builder.period,
                builder.start_date,
                id,
            ),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBudget,
            error => error.into(),
        })
}

/// Delete a budget by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount BETWEEN 0 AND 1e12),
            period TEXT NOT NULL CHECK (period IN ('weekly', 'monthly', 'yearly')),
            start_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        period: row.get(3)?,
        start_date: row.get(4)?,
        created_at: row.get(5)?,
    })
}
