//! The fixed set of categories shared by transactions and budgets.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// What a transaction or budget is for, e.g. "Food & Dining" or "Housing".
///
/// Serialized (and stored in the database) as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
    /// Groceries, restaurants and takeaways.
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    /// Public transport, fuel and parking.
    #[serde(rename = "Transportation")]
    Transportation,
    /// Retail purchases.
    #[serde(rename = "Shopping")]
    Shopping,
    /// Movies, games and subscriptions.
    #[serde(rename = "Entertainment")]
    Entertainment,
    /// Doctors, pharmacy and insurance.
    #[serde(rename = "Healthcare")]
    Healthcare,
    /// Power, water, internet and phone.
    #[serde(rename = "Utilities")]
    Utilities,
    /// Rent, mortgage and rates.
    #[serde(rename = "Housing")]
    Housing,
    /// Courses and books.
    #[serde(rename = "Education")]
    Education,
    /// Flights and accommodation.
    #[serde(rename = "Travel")]
    Travel,
    /// Anything that does not fit another category.
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 10] = [
        Category::FoodAndDining,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::Healthcare,
        Category::Utilities,
        Category::Housing,
        Category::Education,
        Category::Travel,
        Category::Other,
    ];

    /// The display name, which is also the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Utilities => "Utilities",
            Category::Housing => "Housing",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Category, Error};

    #[test]
    fn parses_display_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn rejects_unknown_category() {
        assert_eq!(
            "Gambling".parse::<Category>(),
            Err(Error::InvalidCategory("Gambling".to_owned()))
        );
    }

    #[test]
    fn category_names_are_case_sensitive() {
        assert!("food & dining".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Category::FoodAndDining).unwrap();

        assert_eq!(json, "\"Food & Dining\"");
    }

    #[test]
    fn deserialize_rejects_unknown_category() {
        let result = serde_json::from_str::<Category>("\"Pets\"");

        let error = result.expect_err("unknown category should not deserialize");
        assert!(error.to_string().contains("\"Pets\" is not a valid category"));
    }
}
