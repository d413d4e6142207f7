//! # ql-instruments
//!
//! Contract model for vanilla options on a dividend-paying underlying:
//! payoffs, exercise styles, cash dividend schedules, the option instrument
//! itself, the engine interface, and the sensitivity result sets.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dividend;
pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;
pub mod results;

pub use dividend::{Dividend, DividendSchedule, DividendTime};
pub use exercise::{Exercise, ExerciseType};
pub use instrument::{Instrument, PricingEngine, PricingResults};
pub use option::{DividendVanillaOption, DividendVanillaOptionArguments};
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff, StrikedPayoff};
pub use results::{Greeks, MoreGreeks, OptionResults};
