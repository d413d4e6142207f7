//! # ql-pricingengines
//!
//! Lattice pricing of vanilla options with cash dividends.
//!
//! ## Engines
//!
//! - [`BinomialDividendEngine`]: escrowed-dividend CRR tree, European or
//!   American exercise
//! - [`SensitivityEngine`]: bump-and-reprice greeks on top of
//!   [`binomial_dividend_price`]

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod binomial_dividend_engine;
pub mod config;
pub mod sensitivity;

pub use binomial_dividend_engine::{binomial_dividend_price, BinomialDividendEngine};
pub use config::{BinomialEngineConfig, DEFAULT_TIME_STEPS};
pub use sensitivity::{
    SensitivityEngine, DIVIDEND_YIELD_BUMP, RATE_BUMP, SHORT_THETA_FRACTION, SPOT_BUMP,
    STRIKE_BUMP, THETA_BUMP_DAYS, VOLATILITY_BUMP,
};
