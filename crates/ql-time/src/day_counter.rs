//! `DayCounter` trait and built-in day-count conventions.
//!
//! A day counter computes the **day count fraction**, the fraction of a year
//! between two dates.  The pricing core only ever calls
//! [`DayCounter::year_fraction`]; the conventions below are the ones a caller
//! can plug in.

use std::sync::Arc;

use chrono::Datelike;
use ql_core::{Real, Time};

use crate::calendar::Calendar;
use crate::date::{add_months, days_between, days_in_year, is_end_of_month, is_leap_year, Date};

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name of this convention (e.g. `"Actual/365 (Fixed)"`).
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2` according to this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64;

    /// Fraction of a year between `d1` and `d2` (negative if `d2 < d1`).
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;
}

// ── Actual/fixed-denominator conventions ──────────────────────────────────────

macro_rules! actual_fixed {
    ($(#[$doc:meta])* $name:ident, $label:literal, $denominator:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl DayCounter for $name {
            fn name(&self) -> &str {
                $label
            }

            fn day_count(&self, d1: Date, d2: Date) -> i64 {
                days_between(d1, d2)
            }

            fn year_fraction(&self, d1: Date, d2: Date) -> Time {
                self.day_count(d1, d2) as Real / $denominator
            }
        }
    };
}

actual_fixed!(
    /// Actual/365 (Fixed): `actual_days / 365`.
    Actual365Fixed,
    "Actual/365 (Fixed)",
    365.0
);

actual_fixed!(
    /// Actual/360: `actual_days / 360`.
    Actual360,
    "Actual/360",
    360.0
);

actual_fixed!(
    /// Actual/365.25: `actual_days / 365.25`.
    Actual36525,
    "Actual/365.25",
    365.25
);

// ── Actual/Actual ─────────────────────────────────────────────────────────────

/// Actual/Actual (ISDA).
///
/// The period is split at year boundaries; each piece is divided by the
/// length of the year it falls in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActualIsda;

impl DayCounter for ActualActualIsda {
    fn name(&self) -> &str {
        "Actual/Actual (ISDA)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        days_between(d1, d2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        if d1 == d2 {
            return 0.0;
        }
        if d1 > d2 {
            return -self.year_fraction(d2, d1);
        }
        let y1 = Real::from(days_in_year(d1));
        let y2 = Real::from(days_in_year(d2));
        let head = (y1 - Real::from(d1.ordinal()) + 1.0) / y1;
        let tail = (Real::from(d2.ordinal()) - 1.0) / y2;
        Real::from(d2.year() - d1.year() - 1) + head + tail
    }
}

/// Actual/Actual (AFB / Euro).
///
/// Whole years are counted first, backwards from the end date; the remaining
/// stub is divided by 366 if it contains a 29 February, by 365 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActualAfb;

impl ActualActualAfb {
    fn whole_years(d1: Date, d2: Date) -> i32 {
        let years = d2.year() - d1.year();
        if years == 0 {
            0
        } else if d1.month() > d2.month() {
            years - 1
        } else if d1.month() == d2.month() && is_end_of_month(d1) && is_end_of_month(d2) {
            years
        } else if d1.month() == d2.month() && d1.day() > d2.day() {
            years - 1
        } else {
            years
        }
    }

    fn contains_february_29(d1: Date, d2: Date) -> bool {
        let year = if is_leap_year(d1.year()) {
            d1.year()
        } else if is_leap_year(d2.year()) {
            d2.year()
        } else {
            return false;
        };
        match Date::from_ymd_opt(year, 2, 29) {
            Some(feb29) => d2 > feb29 && d1 <= feb29,
            None => false,
        }
    }
}

impl DayCounter for ActualActualAfb {
    fn name(&self) -> &str {
        "Actual/Actual (AFB)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        days_between(d1, d2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        if d1 == d2 {
            return 0.0;
        }
        if d1 > d2 {
            return -self.year_fraction(d2, d1);
        }
        let years = Self::whole_years(d1, d2);
        let mut stub_end = d2;
        if years > 0 {
            stub_end = match add_months(d2, -12 * years) {
                Ok(d) => d,
                Err(_) => return Real::from(years),
            };
            // month arithmetic clamps 29 Feb to 28 Feb; undo that in leap years
            if is_leap_year(stub_end.year()) && stub_end.month() == 2 && stub_end.day() == 28 {
                stub_end = Date::from_ymd_opt(stub_end.year(), 2, 29).unwrap_or(stub_end);
            }
        }
        let denominator = if Self::contains_february_29(d1, stub_end) {
            366.0
        } else {
            365.0
        };
        Real::from(years) + days_between(d1, stub_end) as Real / denominator
    }
}

// ── 30/360 family ─────────────────────────────────────────────────────────────

fn thirty_360_days(d1: Date, d2: Date, day1: i64, day2: i64) -> i64 {
    360 * i64::from(d2.year() - d1.year())
        + 30 * (i64::from(d2.month()) - i64::from(d1.month()))
        + (day2 - day1)
}

/// 30/360 (Bond Basis).
///
/// A start day of 31 becomes 30; an end day of 31 becomes 30 only when the
/// (adjusted) start day is 30.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360;

impl DayCounter for Thirty360 {
    fn name(&self) -> &str {
        "30/360 (Bond Basis)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        let day1 = i64::from(d1.day().min(30));
        let mut day2 = i64::from(d2.day());
        if day2 == 31 && day1 == 30 {
            day2 = 30;
        }
        thirty_360_days(d1, d2, day1, day2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// 30E/360 (Eurobond Basis): any 31st becomes the 30th.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360European;

impl DayCounter for Thirty360European {
    fn name(&self) -> &str {
        "30E/360 (Eurobond Basis)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        let day1 = i64::from(d1.day().min(30));
        let day2 = i64::from(d2.day().min(30));
        thirty_360_days(d1, d2, day1, day2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// 30/360 (Italian): any 31st and the end of February count as the 30th.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360Italian;

impl Thirty360Italian {
    fn day(date: Date) -> i64 {
        if (date.month() == 2 && date.day() > 27) || date.day() == 31 {
            30
        } else {
            i64::from(date.day())
        }
    }
}

impl DayCounter for Thirty360Italian {
    fn name(&self) -> &str {
        "30/360 (Italian)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        thirty_360_days(d1, d2, Self::day(d1), Self::day(d2))
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

// ── Business/252 ──────────────────────────────────────────────────────────────

/// Business/252: business days of a calendar in `[d1, d2)` divided by 252.
#[derive(Debug, Clone)]
pub struct Business252 {
    calendar: Arc<dyn Calendar>,
}

impl Business252 {
    /// Count business days according to `calendar`.
    pub fn new(calendar: Arc<dyn Calendar>) -> Self {
        Self { calendar }
    }
}

impl DayCounter for Business252 {
    fn name(&self) -> &str {
        "Business/252"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        if d2 < d1 {
            return -self.day_count(d2, d1);
        }
        d1.iter_days()
            .take_while(|d| *d < d2)
            .filter(|d| self.calendar.is_business_day(*d))
            .count() as i64
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 252.0
    }
}
