//! # ql-time
//!
//! Date, calendar, day counter, and business-day-convention types.
//!
//! The pricing core needs only one thing from this crate: a [`DayCounter`]
//! turning a pair of dates into a year fraction.  Calendars are carried by
//! callers that resolve ex-dividend and settlement dates.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and the generic calendars.
pub mod calendar;

/// Concrete calendar implementations.
pub mod calendars;

/// `Date` type and date arithmetic.
pub mod date;

/// `DayCounter` trait and built-in day-count conventions.
pub mod day_counter;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use calendars::Target;
pub use date::Date;
pub use day_counter::{
    Actual360, Actual36525, Actual365Fixed, ActualActualAfb, ActualActualIsda, Business252,
    DayCounter, Thirty360, Thirty360European, Thirty360Italian,
};
