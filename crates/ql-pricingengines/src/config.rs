//! Engine configuration.

use ql_core::errors::{Error, Result};
use ql_core::require;
use serde::{Deserialize, Serialize};

/// Lattice resolution used when none is configured.
pub const DEFAULT_TIME_STEPS: usize = 801;

/// Settings of a [`BinomialDividendEngine`](crate::BinomialDividendEngine).
///
/// Missing fields deserialize to their defaults:
///
/// ```
/// use ql_pricingengines::BinomialEngineConfig;
/// let cfg: BinomialEngineConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(cfg.time_steps, 801);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinomialEngineConfig {
    /// Number of lattice steps between valuation and maturity.
    pub time_steps: usize,
}

impl BinomialEngineConfig {
    /// A configuration with `time_steps` steps.
    pub fn new(time_steps: usize) -> Result<Self> {
        let config = Self { time_steps };
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero step count.
    pub fn validate(&self) -> Result<()> {
        require!(
            self.time_steps > 0,
            Error::invalid_contract("time_steps", "must be positive, got 0")
        );
        Ok(())
    }
}

impl Default for BinomialEngineConfig {
    fn default() -> Self {
        Self {
            time_steps: DEFAULT_TIME_STEPS,
        }
    }
}
