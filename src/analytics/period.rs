//! Calendar windows used to scope analytics to the current week, month or year.

use std::{fmt, ops::RangeInclusive};

use serde::Serialize;
use time::{Date, Duration, Month};

use crate::budget::BudgetPeriod;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// The first day in the window.
    pub start: Date,
    /// The last day in the window.
    pub end: Date,
}

impl DateWindow {
    /// Whether `date` falls inside the window, including both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// The window as a range suitable for database queries.
    pub fn as_range(&self) -> RangeInclusive<Date> {
        self.start..=self.end
    }

    /// The smallest window covering both `self` and `other`.
    pub fn union(self, other: DateWindow) -> DateWindow {
        DateWindow {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// The Monday to Sunday week containing `date`.
pub fn week_bounds(date: Date) -> DateWindow {
    let days_since_monday = date.weekday().number_days_from_monday() as i64;
    let start = date - Duration::days(days_since_monday);

    DateWindow {
        start,
        end: start + Duration::days(6),
    }
}

/// The first to last day of the calendar month containing `date`.
pub fn month_bounds(date: Date) -> DateWindow {
    let start = date - Duration::days(date.day() as i64 - 1);
    let length = last_day_of_month(date.year(), date.month()) as i64;

    DateWindow {
        start,
        end: start + Duration::days(length - 1),
    }
}

/// January 1st to December 31st of the year containing `date`.
pub fn year_bounds(date: Date) -> DateWindow {
    let start = date - Duration::days(date.ordinal() as i64 - 1);
    let length = if is_leap_year(date.year()) { 366 } else { 365 };

    DateWindow {
        start,
        end: start + Duration::days(length - 1),
    }
}

/// The window of `period` that contains `today`.
pub fn current_period_window(period: BudgetPeriod, today: Date) -> DateWindow {
    match period {
        BudgetPeriod::Weekly => week_bounds(today),
        BudgetPeriod::Monthly => month_bounds(today),
        BudgetPeriod::Yearly => year_bounds(today),
    }
}

/// The `count` calendar months ending with the month containing `today`, oldest first.
pub fn trailing_months(today: Date, count: usize) -> Vec<DateWindow> {
    let mut months = Vec::with_capacity(count);
    let mut month = month_bounds(today);

    for _ in 0..count {
        months.push(month);
        month = month_bounds(month.start - Duration::days(1));
    }

    months.reverse();
    months
}

/// A calendar month formatted as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: Month,
}

impl From<Date> for MonthKey {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
