//! Defines the core data models and database queries for transactions.

use std::ops::RangeInclusive;

use rusqlite::{
    Connection, Row, named_params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, category::Category, database_id::TransactionId, validate_amount};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is never negative, whether the money was spent or earned is
/// given by [Transaction::transaction_type].
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// What the money was spent on or where it came from.
    pub category: Category,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new expense in the "Other" category.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            description: description.to_owned(),
            amount,
            category: Category::Other,
            transaction_type: TransactionType::Expense,
            date,
        }
    }
}

/// A builder for creating and updating [Transaction] records.
///
/// The builder is validated when it is written to the database, see
/// [create_transaction] and [update_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A human-readable description of the transaction, must not be blank.
    pub description: String,
    /// The non-negative amount of money that moved.
    pub amount: f64,
    /// The category of the transaction.
    pub category: Category,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The date when the transaction occurred.
    pub date: Date,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set whether the transaction is income or an expense.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    fn validate(mut self) -> Result<Self, Error> {
        self.amount = validate_amount(self.amount, "amount")?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }
        self.description = description.to_owned();

        Ok(self)
    }
}

/// Filters for listing transactions. `None` means "do not filter on this field".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionQuery {
    /// Only include income or only expenses.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions in this category.
    #[serde(default)]
    pub category: Option<Category>,
    /// Only include transactions on or after this date.
    #[serde(default)]
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    #[serde(default)]
    pub end_date: Option<Date>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, description, amount, category, type, date, created_at";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount], [Error::NonFiniteAmount] or [Error::AmountTooLarge] if the
///   amount cannot be stored,
/// - [Error::EmptyDescription] if the description is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (description, amount, category, type, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.category,
                builder.transaction_type,
                builder.date,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions matching `query`, newest first.
///
/// Transactions on the same date are ordered by ID, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE (:type IS NULL OR type = :type)
               AND (:category IS NULL OR category = :category)
               AND (:start_date IS NULL OR date >= :start_date)
               AND (:end_date IS NULL OR date <= :end_date)
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(
            named_params! {
                ":type": query.transaction_type,
                ":category": query.category,
                ":start_date": query.start_date,
                ":end_date": query.end_date,
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the `limit` most recently dated transactions, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_recent_transactions(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC LIMIT :limit"
        ))?
        .query_map(&[(":limit", &limit)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions dated within `date_range` (inclusive), oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_date_range(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC, id ASC"
        ))?
        .query_map((date_range.start(), date_range.end()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the transaction `id` with the fields in `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - a validation error if `builder` is invalid (see [create_transaction]),
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET description = ?1, amount = ?2, category = ?3, type = ?4, date = ?5
             WHERE id = ?6
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.category,
                builder.transaction_type,
                builder.date,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount BETWEEN 0 AND 1e12),
            category TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category);",
    )
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        transaction_type: row.get(4)?,
        date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Category, Error,
        db::initialize,
        transaction::{
            Transaction, TransactionQuery, TransactionType, count_transactions,
            create_transaction, delete_transaction, get_recent_transactions, get_transaction,
            get_transactions, get_transactions_in_date_range, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(4.5, date!(2024 - 03 - 01), "Coffee")
                .category(Category::FoodAndDining),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.id, 1);
                assert_eq!(transaction.amount, 4.5);
                assert_eq!(transaction.description, "Coffee");
                assert_eq!(transaction.category, Category::FoodAndDining);
                assert_eq!(transaction.transaction_type, TransactionType::Expense);
                assert_eq!(transaction.date, date!(2024 - 03 - 01));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_trims_description() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(1.0, date!(2024 - 03 - 01), "  Bus fare \n"),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.description, "Bus fare");
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(-1.0, date!(2024 - 03 - 01), "Refund"),
            &conn,
        );

        assert_eq!(result, Err(Error::NegativeAmount("amount")));
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn create_fails_on_blank_description() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(1.0, date!(2024 - 03 - 01), "   "),
            &conn,
        );

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    #[test]
    fn get_returns_created_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(1200.0, date!(2024 - 03 - 01), "Salary")
                .transaction_type(TransactionType::Income),
            &conn,
        )
        .unwrap();

        let got = get_transaction(created.id, &conn);

        assert_eq!(got, Ok(created));
    }

    #[test]
    fn get_fails_on_missing_id() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_orders_newest_first() {
        let conn = get_test_connection();
        let older = create_transaction(
            Transaction::build(1.0, date!(2024 - 01 - 01), "a"),
            &conn,
        )
        .unwrap();
        let newest = create_transaction(
            Transaction::build(2.0, date!(2024 - 03 - 01), "b"),
            &conn,
        )
        .unwrap();
        let same_day_as_older =
            create_transaction(Transaction::build(3.0, date!(2024 - 01 - 01), "c"), &conn).unwrap();

        let got = get_transactions(&TransactionQuery::default(), &conn).unwrap();

        assert_eq!(got, vec![newest, same_day_as_older, older]);
    }

    #[test]
    fn get_transactions_filters_by_type_and_category() {
        let conn = get_test_connection();
        let today = date!(2024 - 03 - 01);
        let coffee = create_transaction(
            Transaction::build(4.5, today, "Coffee").category(Category::FoodAndDining),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(30.0, today, "Train").category(Category::Transportation),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(50.0, today, "Refund")
                .category(Category::FoodAndDining)
                .transaction_type(TransactionType::Income),
            &conn,
        )
        .unwrap();

        let got = get_transactions(
            &TransactionQuery {
                transaction_type: Some(TransactionType::Expense),
                category: Some(Category::FoodAndDining),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got, vec![coffee]);
    }

    #[test]
    fn get_transactions_filters_by_inclusive_date_range() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(1.0, date!(2024 - 02 - 29), "before"),
            &conn,
        )
        .unwrap();
        let first = create_transaction(
            Transaction::build(1.0, date!(2024 - 03 - 01), "first"),
            &conn,
        )
        .unwrap();
        let last = create_transaction(
            Transaction::build(1.0, date!(2024 - 03 - 31), "last"),
            &conn,
        )
        .unwrap();
        create_transaction(Transaction::build(1.0, date!(2024 - 04 - 01), "after"), &conn).unwrap();

        let got = get_transactions(
            &TransactionQuery {
                start_date: Some(date!(2024 - 03 - 01)),
                end_date: Some(date!(2024 - 03 - 31)),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got, vec![last, first]);
    }

    #[test]
    fn get_recent_transactions_limits_results() {
        let conn = get_test_connection();
        for day in 1..=7 {
            let date = time::Date::from_calendar_date(2024, time::Month::March, day).unwrap();
            create_transaction(Transaction::build(day as f64, date, "daily"), &conn).unwrap();
        }

        let got = get_recent_transactions(5, &conn).unwrap();

        let got_days: Vec<u8> = got.iter().map(|transaction| transaction.date.day()).collect();
        assert_eq!(got_days, [7, 6, 5, 4, 3]);
    }

    #[test]
    fn get_in_date_range_orders_oldest_first() {
        let conn = get_test_connection();
        let later = create_transaction(
            Transaction::build(1.0, date!(2024 - 03 - 20), "later"),
            &conn,
        )
        .unwrap();
        let earlier = create_transaction(
            Transaction::build(1.0, date!(2024 - 03 - 02), "earlier"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(1.0, date!(2024 - 04 - 02), "outside"),
            &conn,
        )
        .unwrap();

        let got =
            get_transactions_in_date_range(date!(2024 - 03 - 01)..=date!(2024 - 03 - 31), &conn)
                .unwrap();

        assert_eq!(got, vec![earlier, later]);
    }

    #[test]
    fn update_overwrites_fields() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(4.5, date!(2024 - 03 - 01), "Coffee"),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            created.id,
            Transaction::build(5.0, date!(2024 - 03 - 02), "Tea").category(Category::FoodAndDining),
            &conn,
        )
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 5.0);
        assert_eq!(updated.description, "Tea");
        assert_eq!(updated.category, Category::FoodAndDining);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(get_transaction(created.id, &conn), Ok(updated));
    }

    #[test]
    fn update_fails_on_missing_id() {
        let conn = get_test_connection();

        let result = update_transaction(
            99,
            Transaction::build(5.0, date!(2024 - 03 - 02), "Tea"),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(4.5, date!(2024 - 03 - 01), "Coffee"),
            &conn,
        )
        .unwrap();

        delete_transaction(created.id, &conn).unwrap();

        assert_eq!(get_transaction(created.id, &conn), Err(Error::NotFound));
        assert_eq!(
            delete_transaction(created.id, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }
}
