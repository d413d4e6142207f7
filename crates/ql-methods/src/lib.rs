//! # ql-methods
//!
//! Lattice methods for options on an underlying paying cash dividends.
//!
//! * [`lattice::BinomialTree`]: Cox-Ross-Rubinstein tree built on the
//!   escrowed-dividend spot
//! * [`lattice::TimeGrid`]: uniform grid of step times
//! * [`lattice::backward_induction`]: European or American roll-back

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Binomial lattice and backward induction.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{backward_induction, BinomialTree, TimeGrid};
