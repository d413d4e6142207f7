//! Black-Scholes-Merton process with flat parameters.
//!
//! `dS/S = (r − q) dt + σ dW`
//!
//! `r` is the continuously compounded risk-free rate, `q` the continuous
//! dividend yield (kept separate from discrete cash dividends) and `σ` the
//! volatility.  Times are year fractions from the reference date under the
//! process's day counter.

use ql_core::errors::{Error, Result};
use ql_core::{require, DiscountFactor, Rate, Real, Time, Volatility};
use ql_time::{Date, DayCounter};
use std::sync::Arc;

/// A constant-parameter Black-Scholes-Merton process.
///
/// Immutable: the `with_*` methods return a bumped copy, which is how the
/// sensitivity engine perturbs one input at a time.
#[derive(Debug, Clone)]
pub struct BlackScholesProcess {
    spot: Real,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    reference_date: Date,
    day_counter: Arc<dyn DayCounter>,
}

impl BlackScholesProcess {
    /// Create a process.
    ///
    /// Requires `spot > 0`, `volatility > 0`, `dividend_yield ≥ 0` and a
    /// finite rate.
    pub fn new(
        spot: Real,
        risk_free_rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
        reference_date: Date,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        require!(
            spot.is_finite() && spot > 0.0,
            Error::invalid_contract("spot", format!("must be positive, got {spot}"))
        );
        require!(
            volatility.is_finite() && volatility > 0.0,
            Error::invalid_contract("volatility", format!("must be positive, got {volatility}"))
        );
        require!(
            risk_free_rate.is_finite(),
            Error::invalid_contract("risk_free_rate", format!("must be finite, got {risk_free_rate}"))
        );
        require!(
            dividend_yield.is_finite() && dividend_yield >= 0.0,
            Error::invalid_contract(
                "dividend_yield",
                format!("must be non-negative, got {dividend_yield}")
            )
        );
        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
            reference_date,
            day_counter,
        })
    }

    /// Spot price at the reference date.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Continuously compounded risk-free rate.
    pub fn risk_free_rate(&self) -> Rate {
        self.risk_free_rate
    }

    /// Continuous dividend yield.
    pub fn dividend_yield(&self) -> Rate {
        self.dividend_yield
    }

    /// Volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// The valuation date times are measured from.
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Day counter used to turn dates into times.
    pub fn day_counter(&self) -> &dyn DayCounter {
        &*self.day_counter
    }

    /// Shared handle to the day counter.
    pub fn day_counter_handle(&self) -> Arc<dyn DayCounter> {
        Arc::clone(&self.day_counter)
    }

    /// Year fraction from the reference date to `date`.
    pub fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter.year_fraction(self.reference_date, date)
    }

    /// Risk-free discount factor `e^(−r t)`.
    pub fn discount(&self, t: Time) -> DiscountFactor {
        (-self.risk_free_rate * t).exp()
    }

    /// Expected growth of the spot over `dt`: `e^((r − q) dt)`.
    pub fn growth(&self, dt: Time) -> Real {
        ((self.risk_free_rate - self.dividend_yield) * dt).exp()
    }

    /// Copy with a different spot.
    pub fn with_spot(&self, spot: Real) -> Result<Self> {
        Self::new(
            spot,
            self.risk_free_rate,
            self.dividend_yield,
            self.volatility,
            self.reference_date,
            self.day_counter_handle(),
        )
    }

    /// Copy with a different volatility.
    pub fn with_volatility(&self, volatility: Volatility) -> Result<Self> {
        Self::new(
            self.spot,
            self.risk_free_rate,
            self.dividend_yield,
            volatility,
            self.reference_date,
            self.day_counter_handle(),
        )
    }

    /// Copy with a different risk-free rate.
    pub fn with_risk_free_rate(&self, risk_free_rate: Rate) -> Result<Self> {
        Self::new(
            self.spot,
            risk_free_rate,
            self.dividend_yield,
            self.volatility,
            self.reference_date,
            self.day_counter_handle(),
        )
    }

    /// Copy with a different dividend yield.
    pub fn with_dividend_yield(&self, dividend_yield: Rate) -> Result<Self> {
        Self::new(
            self.spot,
            self.risk_free_rate,
            dividend_yield,
            self.volatility,
            self.reference_date,
            self.day_counter_handle(),
        )
    }

    /// Copy anchored at a different reference date.
    pub fn with_reference_date(&self, reference_date: Date) -> Self {
        Self {
            reference_date,
            ..self.clone()
        }
    }
}
