//! Discrete cash dividends.
//!
//! A [`DividendSchedule`] holds `(ex-date, amount)` pairs sorted by date.
//! Before reaching the lattice it is normalized against a valuation date,
//! a maturity date and a day counter into `(τᵢ, Dᵢ)` pairs, see
//! [`DividendSchedule::times`].

use ql_core::errors::{Error, Result};
use ql_core::{ensure, require, Real, Time};
use ql_time::{Date, DayCounter};
use std::fmt;

/// A single cash dividend paid on its ex-date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dividend {
    /// Ex-dividend date.
    pub date: Date,
    /// Cash amount.
    pub amount: Real,
}

impl Dividend {
    /// A cash dividend of `amount` going ex on `date`.
    pub fn cash(date: Date, amount: Real) -> Self {
        Self { date, amount }
    }
}

impl fmt::Display for Dividend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.amount, self.date)
    }
}

/// A dividend expressed as a year fraction from the valuation date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividendTime {
    /// Year fraction from valuation to the ex-date.
    pub time: Time,
    /// Cash amount.
    pub amount: Real,
}

/// Cash dividends sorted ascending by ex-date.
///
/// Several dividends may share an ex-date; they are kept as separate entries
/// and end up in the same escrow term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSchedule {
    dividends: Vec<Dividend>,
}

impl DividendSchedule {
    /// An empty schedule.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schedule from cash dividends in any order.
    ///
    /// Negative or non-finite amounts are rejected with
    /// [`Error::InvalidDividend`].
    pub fn new(mut dividends: Vec<Dividend>) -> Result<Self> {
        for d in &dividends {
            require!(
                d.amount.is_finite(),
                Error::invalid_dividend(d.date, d.amount, "amount is not finite")
            );
            require!(
                d.amount >= 0.0,
                Error::invalid_dividend(d.date, d.amount, "amount is negative")
            );
        }
        dividends.sort_by_key(|d| d.date);
        Ok(Self { dividends })
    }

    /// Build a schedule from parallel slices of ex-dates and amounts.
    pub fn from_dates_and_amounts(dates: &[Date], amounts: &[Real]) -> Result<Self> {
        ensure!(
            dates.len() == amounts.len(),
            "{} dividend dates but {} amounts",
            dates.len(),
            amounts.len()
        );
        Self::new(
            dates
                .iter()
                .zip(amounts)
                .map(|(&date, &amount)| Dividend::cash(date, amount))
                .collect(),
        )
    }

    /// The dividends, sorted by ex-date.
    pub fn dividends(&self) -> &[Dividend] {
        &self.dividends
    }

    /// Number of dividends.
    pub fn len(&self) -> usize {
        self.dividends.len()
    }

    /// Whether the schedule holds no dividend.
    pub fn is_empty(&self) -> bool {
        self.dividends.is_empty()
    }

    /// Sum of the cash amounts (undiscounted).
    pub fn total_amount(&self) -> Real {
        self.dividends.iter().map(|d| d.amount).sum()
    }

    /// The dividends going ex strictly after `date`.
    pub fn after(&self, date: Date) -> Self {
        Self {
            dividends: self
                .dividends
                .iter()
                .filter(|d| d.date > date)
                .copied()
                .collect(),
        }
    }

    /// Check that every ex-date lies strictly inside `(valuation, maturity)`.
    pub fn check_window(&self, valuation: Date, maturity: Date) -> Result<()> {
        for d in &self.dividends {
            require!(
                d.date > valuation,
                Error::invalid_dividend(
                    d.date,
                    d.amount,
                    format!("ex-date is not after the valuation date {valuation}")
                )
            );
            require!(
                d.date < maturity,
                Error::invalid_dividend(
                    d.date,
                    d.amount,
                    format!("ex-date is not before the maturity date {maturity}")
                )
            );
        }
        Ok(())
    }

    /// Normalize the schedule into `(τᵢ, Dᵢ)` pairs.
    ///
    /// `τᵢ` is the `day_counter` year fraction from `valuation` to the
    /// ex-date.  Every dividend must satisfy `valuation < date < maturity`
    /// and its year fraction must fall in `(0, τ)`, where `τ` is the year
    /// fraction to maturity.
    pub fn times(
        &self,
        valuation: Date,
        maturity: Date,
        day_counter: &dyn DayCounter,
    ) -> Result<Vec<DividendTime>> {
        self.check_window(valuation, maturity)?;
        let tau = day_counter.year_fraction(valuation, maturity);
        self.dividends
            .iter()
            .map(|d| {
                let time = day_counter.year_fraction(valuation, d.date);
                require!(
                    time > 0.0 && time < tau,
                    Error::invalid_dividend(
                        d.date,
                        d.amount,
                        format!(
                            "year fraction {time} under {} is outside (0, {tau})",
                            day_counter.name()
                        )
                    )
                );
                Ok(DividendTime {
                    time,
                    amount: d.amount,
                })
            })
            .collect()
    }
}
