//! `Calendar` trait and the generic calendars.
//!
//! A calendar knows which dates are business days and can adjust dates
//! according to a [`BusinessDayConvention`].

use chrono::{Datelike, Weekday};
use ql_core::errors::Result;

use crate::business_day_convention::BusinessDayConvention;
use crate::date::{add_days, Date};

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"TARGET"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is a holiday (non-business) day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Return `true` if `date` is a weekend according to this calendar.
    fn is_weekend(&self, date: Date) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Adjust `date` according to the given business-day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Result<Date> {
        match convention {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => roll(self, date, 1),
            BusinessDayConvention::Preceding => roll(self, date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = roll(self, date, 1)?;
                if adjusted.month() != date.month() {
                    roll(self, date, -1)
                } else {
                    Ok(adjusted)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = roll(self, date, -1)?;
                if adjusted.month() != date.month() {
                    roll(self, date, 1)
                } else {
                    Ok(adjusted)
                }
            }
        }
    }

    /// Advance `date` by `n` business days.
    fn advance_business_days(&self, mut date: Date, n: i32) -> Result<Date> {
        let step = if n >= 0 { 1 } else { -1 };
        let mut remaining = n.unsigned_abs();
        while remaining > 0 {
            date = add_days(date, step)?;
            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        Ok(date)
    }

    /// Count the business days between `d1` (exclusive) and `d2`
    /// (inclusive).  Returns a negative number if `d2 < d1`.
    fn business_days_between(&self, d1: Date, d2: Date) -> i64 {
        let (start, end, sign) = if d2 >= d1 { (d1, d2, 1) } else { (d2, d1, -1) };
        let count = start
            .iter_days()
            .skip(1)
            .take_while(|d| *d <= end)
            .filter(|d| self.is_business_day(*d))
            .count() as i64;
        sign * count
    }
}

/// Move from `date` in steps of `step` days until a business day is reached.
fn roll<C: Calendar + ?Sized>(calendar: &C, mut date: Date, step: i64) -> Result<Date> {
    while calendar.is_holiday(date) {
        date = add_days(date, step)?;
    }
    Ok(date)
}

/// A null calendar: every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }

    fn is_weekend(&self, _date: Date) -> bool {
        false
    }
}

/// A calendar that treats only Saturdays and Sundays as non-business days.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.is_weekend(date)
    }
}
