//! TARGET (Trans-European Automated Real-time Gross Settlement) calendar.

use chrono::{Datelike, Days};

use crate::calendar::Calendar;
use crate::date::Date;

/// TARGET calendar (ECB's settlement system).
///
/// Weekends and the following holidays are observed:
/// * New Year's Day (Jan 1)
/// * Good Friday (from 2000)
/// * Easter Monday (from 2000)
/// * Labour Day (May 1, from 2000)
/// * Christmas Day (Dec 25)
/// * Boxing Day (Dec 26)
/// * December 31 of 1998, 1999, and 2001
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if self.is_weekend(date) {
            return false;
        }
        let (y, m, d) = (date.year(), date.month(), date.day());
        let easter = easter_sunday(y);
        let good_friday = easter.and_then(|e| e.checked_sub_days(Days::new(2)));
        let easter_monday = easter.and_then(|e| e.checked_add_days(Days::new(1)));

        let holiday = (d == 1 && m == 1)
            || (y >= 2000 && Some(date) == good_friday)
            || (y >= 2000 && Some(date) == easter_monday)
            || (y >= 2000 && d == 1 && m == 5)
            || (d == 25 && m == 12)
            || (d == 26 && m == 12)
            || (d == 31 && m == 12 && matches!(y, 1998 | 1999 | 2001));
        !holiday
    }
}

/// Easter Sunday of `year` in the Gregorian calendar (anonymous algorithm).
pub fn easter_sunday(year: i32) -> Option<Date> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    Date::from_ymd_opt(year, month as u32, day as u32)
}
