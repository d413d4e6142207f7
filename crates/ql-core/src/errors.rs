//! Error types for the dividend lattice workspace.
//!
//! Every failure the pricing core can detect is a variant of a single
//! `thiserror`-derived enum.  Each variant carries the offending input so the
//! caller can fix it directly: the parameter name for contract errors, the
//! ex-date for dividend errors, and the full `(r, q, σ, Δt)` combination for
//! lattice errors.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{Rate, Real, Time, Volatility};

/// The top-level error type of the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A contract input is out of its domain (non-positive spot, strike,
    /// volatility, or step count; inconsistent settlement / maturity dates).
    #[error("invalid contract: {parameter} {reason}")]
    InvalidContract {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A cash dividend is negative or not strictly inside
    /// (valuation date, maturity date).
    #[error("invalid dividend of {amount} on {date}: {reason}")]
    InvalidDividend {
        /// Ex-date of the rejected dividend.
        date: NaiveDate,
        /// Cash amount of the rejected dividend.
        amount: Real,
        /// What is wrong with it.
        reason: String,
    },

    /// The present value of the dividends reaches or exceeds the spot, so the
    /// escrowed spot would not be strictly positive.
    #[error(
        "inconsistent dividend schedule: dividend present value {dividend_pv} \
         is not below spot {spot}"
    )]
    InconsistentDividendSchedule {
        /// Present value at valuation of all escrowed dividends.
        dividend_pv: Real,
        /// Spot price of the underlying.
        spot: Real,
    },

    /// The risk-neutral up-probability of the lattice is outside (0, 1).
    #[error(
        "invalid lattice parameters: up-probability {probability} outside (0, 1) \
         for r = {rate}, q = {dividend_yield}, sigma = {volatility}, dt = {dt}"
    )]
    InvalidLatticeParameters {
        /// The computed up-probability.
        probability: Real,
        /// Risk-free rate.
        rate: Rate,
        /// Continuous dividend yield.
        dividend_yield: Rate,
        /// Volatility.
        volatility: Volatility,
        /// Step size in years.
        dt: Time,
    },

    /// The requested operation is declared but not supported.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Precondition violated in a low-level routine.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Date arithmetic left the representable range.
    #[error("date error: {0}")]
    Date(String),
}

impl Error {
    /// Build an [`Error::InvalidContract`] for `parameter`.
    pub fn invalid_contract(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidContract {
            parameter,
            reason: reason.into(),
        }
    }

    /// Build an [`Error::InvalidDividend`] for the dividend `(date, amount)`.
    pub fn invalid_dividend(date: NaiveDate, amount: Real, reason: impl Into<String>) -> Self {
        Error::InvalidDividend {
            date,
            amount,
            reason: reason.into(),
        }
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err($err)` if `$cond` is false.
///
/// Used where the failure has a dedicated error variant.
///
/// # Example
/// ```
/// use ql_core::{require, errors::Error};
/// fn strike(k: f64) -> ql_core::errors::Result<f64> {
///     require!(k > 0.0, Error::invalid_contract("strike", format!("must be positive, got {k}")));
///     Ok(k)
/// }
/// assert!(strike(40.0).is_ok());
/// assert!(matches!(
///     strike(0.0),
///     Err(Error::InvalidContract { parameter: "strike", .. })
/// ));
/// ```
#[macro_export]
macro_rules! require {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}
