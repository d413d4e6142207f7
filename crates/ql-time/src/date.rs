//! `Date` type and calendar arithmetic helpers.
//!
//! Dates are plain `chrono::NaiveDate` values.  The helpers here add the
//! QuantLib-style operations the pricing code needs on top of chrono:
//! fallible construction and day / month arithmetic that report an
//! [`Error::Date`] instead of panicking.

use chrono::{Datelike, Days, Months, NaiveDate};
use ql_core::errors::{Error, Result};

/// A calendar date.
pub type Date = NaiveDate;

/// Create a date from year, month (1–12), and day-of-month (1–31).
pub fn ymd(year: i32, month: u32, day: u32) -> Result<Date> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::Date(format!("{year}-{month:02}-{day:02} is not a valid date")))
}

/// Advance `date` by `n` calendar days (`n` may be negative).
pub fn add_days(date: Date, n: i64) -> Result<Date> {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| Error::Date(format!("{date} advanced by {n} days is out of range")))
}

/// Advance `date` by `n` months (`n` may be negative).
///
/// The day of month is clamped to the length of the target month, so
/// 31 January + 1 month is the last day of February.
pub fn add_months(date: Date, n: i32) -> Result<Date> {
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| Error::Date(format!("{date} advanced by {n} months is out of range")))
}

/// Whether a given year is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the year containing `date` (365 or 366).
pub fn days_in_year(date: Date) -> u32 {
    if is_leap_year(date.year()) {
        366
    } else {
        365
    }
}

/// Number of days in a given month/year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Whether `date` is the last calendar day of its month.
pub fn is_end_of_month(date: Date) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

/// Number of calendar days from `d1` to `d2` (negative if `d2 < d1`).
pub fn days_between(d1: Date, d2: Date) -> i64 {
    d2.signed_duration_since(d1).num_days()
}
