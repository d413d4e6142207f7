//! # quantlib
//!
//! Binomial-lattice pricing of European and American vanilla options on a
//! stock paying discrete cash dividends.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use quantlib::helpers::DividendOptionHelper;
//! use quantlib::instruments::OptionType;
//! use quantlib::time::date::ymd;
//!
//! let helper = DividendOptionHelper::builder()
//!     .option_type(OptionType::Call)
//!     .spot(100.0)
//!     .strike(100.0)
//!     .risk_free_rate(0.05)
//!     .volatility(0.25)
//!     .valuation_date(ymd(2024, 1, 2)?)
//!     .settlement_date(ymd(2024, 1, 4)?)
//!     .maturity_date(ymd(2025, 1, 2)?)
//!     .dividend(ymd(2024, 6, 14)?, 1.5)
//!     .time_steps(100)
//!     .crr_european()?;
//! let results = helper.results()?;
//! assert!(results.value > 0.0);
//! assert!((0.0..=1.0).contains(&results.greeks.delta));
//! # Ok::<(), quantlib::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Date, calendar, and day counter types.
pub use ql_time as time;

/// The Black-Scholes market process.
pub use ql_processes as processes;

/// Time grid, CRR lattice and backward induction.
pub use ql_methods as methods;

/// Payoffs, exercises, dividend schedules and the dividend option.
pub use ql_instruments as instruments;

/// The binomial dividend engine and finite-difference greeks.
pub use ql_pricingengines as pricingengines;

/// One-stop builders for priced dividend options.
pub use ql_helpers as helpers;
