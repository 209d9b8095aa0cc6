//! # ql-instruments
//!
//! Option payoffs, exercise schedules, the vanilla option instrument (with
//! or without discrete dividends), and the pricing-engine contract.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use exercise::{Exercise, ExerciseType};
pub use instrument::{Instrument, PricingEngine, PricingResults};
pub use option::{
    DividendVanillaOption, OneAssetOptionResults, VanillaOption, VanillaOptionArguments,
};
pub use payoff::{
    AssetOrNothingPayoff, CashOrNothingPayoff, ForwardPayoff, OptionType, Payoff, PayoffKind,
    PlainVanillaPayoff, Position, StrikedPayoff,
};
