//! `Instrument` and `PricingEngine` traits.
//!
//! Instruments describe a contract; engines turn the contract's arguments
//! into [`PricingResults`].  There is no global evaluation date: anything
//! date-dependent takes the valuation date explicitly.

use ql_core::{errors::Result, Real};
use ql_time::Date;
use std::collections::HashMap;

/// Output of one pricing run.
///
/// Holds the NPV and any named side results an engine chooses to report
/// (step count, finite-difference greeks, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingResults {
    /// Net present value at the valuation date.
    pub npv: Real,
    /// Named side results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Results holding only an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: HashMap::new(),
        }
    }

    /// Attach a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// A pricing engine for instruments whose arguments are `Args`.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<PricingResults>;
}

/// A priceable contract.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// The last date on which the contract has value.
    fn maturity_date(&self) -> Date;

    /// Whether the contract has expired as of `valuation`.
    fn is_expired(&self, valuation: Date) -> bool {
        self.maturity_date() <= valuation
    }
}
