//! # quantlib-fd
//!
//! Finite-difference pricing of path-dependent equity options: American,
//! Bermudan and shout exercise on underlyings paying discrete dividends,
//! with a control-variate correction against the Black formula.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use quantlib_fd::prelude::*;
//! use std::sync::Arc;
//!
//! let process = Arc::new(GeneralizedBlackScholesProcess::new(
//!     100.0,
//!     Arc::new(FlatForward::new(0.05)),
//!     Arc::new(FlatForward::new(0.0)),
//!     Arc::new(BlackConstantVol::new(0.2)),
//! ));
//! let settings = FdmSettings::default().with_time_steps(200).with_grid_points(201);
//! let engine = FdStepConditionEngine::new(process, settings);
//!
//! let option = VanillaOption::american(OptionType::Put, 100.0, 1.0)?;
//! let results = option.price(&engine)?;
//! assert!(results.value > 6.0 && results.value < 6.2);
//! # Ok::<(), quantlib_fd::core::Error>(())
//! ```
//!
//! Logging goes through `tracing` when the default `logging` feature is on;
//! install a subscriber to see the grid set-up and control-variate events.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Arrays, sampled curves, interpolation and normal distributions.
pub use ql_math as math;

/// Yield and Black-volatility term structures.
pub use ql_termstructures as termstructures;

/// The generalized Black-Scholes process.
pub use ql_processes as processes;

/// Discrete dividends.
pub use ql_cashflows as cashflows;

/// Payoffs, exercises and vanilla options.
pub use ql_instruments as instruments;

/// Finite-difference operators, conditions and rollback.
pub use ql_methods as methods;

/// Analytic and finite-difference pricing engines.
pub use ql_pricingengines as pricingengines;

/// The items most pricing code needs.
pub mod prelude {
    pub use ql_cashflows::{Dividend, DividendSchedule};
    pub use ql_core::{Error, Real, Result, Time};
    pub use ql_instruments::{
        DividendVanillaOption, Exercise, OneAssetOptionResults, OptionType, PlainVanillaPayoff,
        PricingEngine, VanillaOption,
    };
    pub use ql_methods::{FdmScheme, FdmSettings};
    pub use ql_pricingengines::{AnalyticEuropeanEngine, ExerciseRight, FdStepConditionEngine};
    pub use ql_processes::GeneralizedBlackScholesProcess;
    pub use ql_termstructures::{BlackConstantVol, BlackVarianceCurve, FlatForward};
}
