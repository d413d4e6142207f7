//! Binomial engine for vanilla options with discrete cash dividends.
//!
//! Prices European and American options on a Cox-Ross-Rubinstein tree built
//! with the escrowed-dividend technique.  The same function serves as the
//! pure pricing function the [`SensitivityEngine`] bumps.

use crate::config::BinomialEngineConfig;
use crate::sensitivity::SensitivityEngine;
use ql_core::errors::{Error, Result};
use ql_core::{require, Real, Size, Time};
use ql_instruments::{DividendTime, DividendVanillaOptionArguments, PricingEngine, PricingResults};
use ql_methods::{backward_induction, BinomialTree};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// Price `args` under `process` on a `time_steps`-step CRR lattice.
///
/// The valuation date is the process's reference date.  Dividends are
/// normalized with the process's day counter and must lie strictly between
/// valuation and maturity.
pub fn binomial_dividend_price(
    process: &BlackScholesProcess,
    args: &DividendVanillaOptionArguments,
    time_steps: Size,
) -> Result<Real> {
    let valuation = process.reference_date();
    let maturity = args.exercise.last_date();
    require!(
        maturity > valuation,
        Error::invalid_contract(
            "maturity",
            format!("{maturity} is not after the valuation date {valuation}")
        )
    );
    let tau = process.time_from_reference(maturity);
    require!(
        tau > 0.0,
        Error::invalid_contract(
            "maturity",
            format!(
                "year fraction {tau} to {maturity} under {} is not positive",
                process.day_counter().name()
            )
        )
    );

    let dividends = args
        .dividends
        .times(valuation, maturity, process.day_counter())?;
    lattice_price(process, args, tau, &dividends, time_steps)
}

/// Price `args` on a lattice spanning `tau` years with already normalized
/// `dividends`; the contract's dates are not consulted.
pub(crate) fn lattice_price(
    process: &BlackScholesProcess,
    args: &DividendVanillaOptionArguments,
    tau: Time,
    dividends: &[DividendTime],
    time_steps: Size,
) -> Result<Real> {
    let tree = BinomialTree::cox_ross_rubinstein(process, tau, time_steps, dividends)?;
    Ok(backward_induction(
        &tree,
        &*args.payoff,
        args.exercise.exercise_type(),
    ))
}

/// Pricing engine for [`DividendVanillaOptionArguments`].
///
/// Reports the NPV and the `"time_steps"` used.  With
/// [`with_greeks`](Self::with_greeks) it also reports `"delta"`, `"gamma"`,
/// `"theta"`, `"vega"`, `"rho"` and `"dividend_rho"`.
#[derive(Debug, Clone)]
pub struct BinomialDividendEngine {
    process: Arc<BlackScholesProcess>,
    config: BinomialEngineConfig,
    greeks: bool,
}

impl BinomialDividendEngine {
    /// Create an engine on `process`.
    pub fn new(process: Arc<BlackScholesProcess>, config: BinomialEngineConfig) -> Self {
        Self {
            process,
            config,
            greeks: false,
        }
    }

    /// Also compute finite-difference greeks on every `calculate`.
    pub fn with_greeks(mut self, greeks: bool) -> Self {
        self.greeks = greeks;
        self
    }

    /// The underlying process.
    pub fn process(&self) -> &BlackScholesProcess {
        &self.process
    }

    /// The engine settings.
    pub fn config(&self) -> &BinomialEngineConfig {
        &self.config
    }
}

impl PricingEngine<DividendVanillaOptionArguments> for BinomialDividendEngine {
    fn calculate(&self, args: &DividendVanillaOptionArguments) -> Result<PricingResults> {
        self.config.validate()?;
        let steps = self.config.time_steps;
        let npv = binomial_dividend_price(&self.process, args, steps)?;
        let results = PricingResults::from_npv(npv).with_result("time_steps", steps as Real);
        if !self.greeks {
            return Ok(results);
        }

        let g = SensitivityEngine::new(&self.process, args, steps)
            .with_base_value(npv)
            .greeks()?;
        Ok(results
            .with_result("delta", g.delta)
            .with_result("gamma", g.gamma)
            .with_result("theta", g.theta)
            .with_result("vega", g.vega)
            .with_result("rho", g.rho)
            .with_result("dividend_rho", g.dividend_rho))
    }
}
