//! Vanilla option paying discrete cash dividends.

use crate::dividend::DividendSchedule;
use crate::exercise::Exercise;
use crate::instrument::{Instrument, PricingEngine, PricingResults};
use crate::payoff::{OptionType, PlainVanillaPayoff, StrikedPayoff};
use ql_core::errors::{Error, Result};
use ql_core::{require, Real};
use ql_time::Date;
use std::sync::Arc;

/// Arguments handed to a pricing engine for a [`DividendVanillaOption`].
#[derive(Debug, Clone)]
pub struct DividendVanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn StrikedPayoff>,
    /// When the option can be exercised.
    pub exercise: Exercise,
    /// Cash dividends paid before expiry.
    pub dividends: DividendSchedule,
}

/// A single-asset vanilla option whose underlying pays cash dividends.
#[derive(Debug, Clone)]
pub struct DividendVanillaOption {
    payoff: Arc<dyn StrikedPayoff>,
    exercise: Exercise,
    dividends: DividendSchedule,
}

impl DividendVanillaOption {
    /// Create a new option.
    ///
    /// The strike must be finite and positive.
    pub fn new(
        payoff: Arc<dyn StrikedPayoff>,
        exercise: Exercise,
        dividends: DividendSchedule,
    ) -> Result<Self> {
        let strike = payoff.strike();
        require!(
            strike.is_finite() && strike > 0.0,
            Error::invalid_contract("strike", format!("must be positive, got {strike}"))
        );
        Ok(Self {
            payoff,
            exercise,
            dividends,
        })
    }

    /// Convenience: a plain vanilla call or put.
    pub fn vanilla(
        option_type: OptionType,
        strike: Real,
        exercise: Exercise,
        dividends: DividendSchedule,
    ) -> Result<Self> {
        Self::new(
            Arc::new(PlainVanillaPayoff::new(option_type, strike)),
            exercise,
            dividends,
        )
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        self.payoff.strike()
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type()
    }

    /// The payoff.
    pub fn payoff(&self) -> &dyn StrikedPayoff {
        &*self.payoff
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// The dividend schedule.
    pub fn dividends(&self) -> &DividendSchedule {
        &self.dividends
    }

    /// Arguments for a pricing engine.
    pub fn arguments(&self) -> DividendVanillaOptionArguments {
        DividendVanillaOptionArguments {
            payoff: Arc::clone(&self.payoff),
            exercise: self.exercise,
            dividends: self.dividends.clone(),
        }
    }

    /// Price this option with `engine`.
    pub fn price(
        &self,
        engine: &dyn PricingEngine<DividendVanillaOptionArguments>,
    ) -> Result<PricingResults> {
        engine.calculate(&self.arguments())
    }
}

impl Instrument for DividendVanillaOption {
    fn maturity_date(&self) -> Date {
        self.exercise.last_date()
    }
}
