//! # ql-helpers
//!
//! One-stop pricing of vanilla options with cash dividends.
//!
//! [`DividendOptionHelper`] takes raw market and contract inputs, validates
//! them once, and answers NPV and greek queries on a CRR lattice with
//! either European or American exercise.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dividend_option_helper;

pub use dividend_option_helper::{DividendOptionHelper, DividendOptionHelperBuilder};
