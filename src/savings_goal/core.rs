//! Defines the core data models and database queries for savings goals.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::SavingsGoalId, validate_amount};

// ============================================================================
// MODELS
// ============================================================================

/// An amount of money the user wants to save, optionally by a certain date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// The ID of the savings goal.
    pub id: SavingsGoalId,
    /// What the user is saving for, e.g. "Emergency fund".
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: f64,
    /// How much has been saved so far.
    pub current_amount: f64,
    /// When the user wants to reach the target, if they have a deadline.
    pub target_date: Option<Date>,
    /// How far along the goal is as a percentage between 0 and 100.
    pub progress_percentage: f64,
    /// When the savings goal was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl SavingsGoal {
    /// Create a new savings goal with nothing saved and no deadline.
    ///
    /// Shortcut for [SavingsGoalBuilder] for discoverability.
    pub fn build(name: &str, target_amount: f64) -> SavingsGoalBuilder {
        SavingsGoalBuilder {
            name: name.to_owned(),
            target_amount,
            current_amount: 0.0,
            target_date: None,
        }
    }
}

/// The fields needed to create or update a [SavingsGoal].
///
/// When deserialized, `current_amount` defaults to zero and `target_date` to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalBuilder {
    /// What the user is saving for, must not be blank.
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: f64,
    /// How much has been saved so far.
    #[serde(default)]
    pub current_amount: f64,
    /// When the user wants to reach the target.
    #[serde(default)]
    pub target_date: Option<Date>,
}

impl SavingsGoalBuilder {
    /// Set how much has been saved so far.
    pub fn current_amount(mut self, current_amount: f64) -> Self {
        self.current_amount = current_amount;
        self
    }

    /// Set the date the user wants to reach the target by.
    pub fn target_date(mut self, target_date: Option<Date>) -> Self {
        self.target_date = target_date;
        self
    }

    fn validate(mut self) -> Result<Self, Error> {
        self.target_amount = validate_amount(self.target_amount, "target_amount")?;
        self.current_amount = validate_amount(self.current_amount, "current_amount")?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::EmptyGoalName);
        }
        self.name = name.to_owned();

        Ok(self)
    }
}

/// The progress towards `target_amount` as a percentage clamped to [0, 100].
///
/// A goal with a target of zero has a progress of zero.
pub fn progress_percentage(current_amount: f64, target_amount: f64) -> f64 {
    if target_amount <= 0.0 {
        return 0.0;
    }

    (current_amount * 100.0 / target_amount).clamp(0.0, 100.0)
}

/// Totals across every savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    /// The sum of the current amounts of all goals.
    pub total_saved: f64,
    /// The sum of the target amounts of all goals.
    pub total_target: f64,
    /// The mean of the (clamped) progress of all goals, zero if there are no goals.
    pub average_progress: f64,
    /// How many goals have reached their target.
    pub completed_goals: usize,
}

/// Summarise `goals` into totals and an average progress.
pub fn summarise_goals(goals: &[SavingsGoal]) -> SavingsSummary {
    let total_saved = goals
        .iter()
        .fold(0.0, |total, goal| total + goal.current_amount);
    let total_target = goals
        .iter()
        .fold(0.0, |total, goal| total + goal.target_amount);
    let average_progress = if goals.is_empty() {
        0.0
    } else {
        goals
            .iter()
            .fold(0.0, |total, goal| total + goal.progress_percentage)
            / goals.len() as f64
    };
    let completed_goals = goals
        .iter()
        .filter(|goal| goal.progress_percentage >= 100.0)
        .count();

    SavingsSummary {
        total_saved,
        total_target,
        average_progress,
        completed_goals,
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, name, target_amount, current_amount, target_date, created_at";

/// Create a new savings goal in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount], [Error::NonFiniteAmount] or [Error::AmountTooLarge] if either
///   amount cannot be stored,
/// - [Error::EmptyGoalName] if the name is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_savings_goal(
    builder: SavingsGoalBuilder,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let builder = builder.validate()?;

    let goal = connection
        .prepare(&format!(
            "INSERT INTO savings_goal (name, target_amount, current_amount, target_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.name,
                builder.target_amount,
                builder.current_amount,
                builder.target_date,
                OffsetDateTime::now_utc(),
            ),
            map_savings_goal_row,
        )?;

    Ok(goal)
}

/// Retrieve a savings goal by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid savings goal,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_savings_goal(id: SavingsGoalId, connection: &Connection) -> Result<SavingsGoal, Error> {
    let goal = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM savings_goal WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_savings_goal_row)?;

    Ok(goal)
}

/// Retrieve all savings goals, the most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_savings_goals(connection: &Connection) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM savings_goal ORDER BY id DESC"
        ))?
        .query_map([], map_savings_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the savings goal `id` with the fields in `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingSavingsGoal] if `id` does not refer to a valid savings goal,
/// - a validation error if `builder` is invalid (see [create_savings_goal]),
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_savings_goal(
    id: SavingsGoalId,
    builder: SavingsGoalBuilder,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let builder = builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE savings_goal
             SET name = ?1, target_amount = ?2, current_amount = ?3, target_date = ?4
             WHERE id = ?5
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.name,
                builder.target_amount,
                builder.current_amount,
                builder.target_date,
                id,
            ),
            map_savings_goal_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingSavingsGoal,
            error => error.into(),
        })
}

/// Delete a savings goal by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingSavingsGoal] if `id` does not refer to a valid savings goal,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_savings_goal(id: SavingsGoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM savings_goal WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingSavingsGoal);
    }

    Ok(())
}

/// Create the savings goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_goal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK (target_amount BETWEEN 0 AND 1e12),
            current_amount REAL NOT NULL DEFAULT 0 CHECK (current_amount BETWEEN 0 AND 1e12),
            target_date TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_savings_goal_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    let target_amount = row.get(2)?;
    let current_amount = row.get(3)?;

    Ok(SavingsGoal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount,
        current_amount,
        target_date: row.get(4)?,
        progress_percentage: progress_percentage(current_amount, target_amount),
        created_at: row.get(5)?,
    })
}
