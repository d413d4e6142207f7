//! # ql-processes
//!
//! The diffusion the lattice discretizes: a Black-Scholes-Merton process
//! with constant rate, dividend yield and volatility, anchored at an explicit
//! reference (valuation) date.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes_process;

pub use black_scholes_process::BlackScholesProcess;
