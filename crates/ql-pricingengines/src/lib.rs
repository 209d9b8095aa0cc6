//! # ql-pricingengines
//!
//! Pricing engines for one-asset options.
//!
//! ## Engines
//!
//! - [`AnalyticEuropeanEngine`]: Black-Scholes-Merton closed form through [`BlackCalculator`]
//! - [`FdStepConditionEngine`]: finite-difference rollback with American, Bermudan or
//!   shout exercise and discrete dividends, corrected by a European control variate

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod black_calculator;
pub mod fd_step_condition_engine;
pub mod fd_vanilla_engine;

pub use analytic_european_engine::{black_scholes_merton, AnalyticEuropeanEngine};
pub use black_calculator::BlackCalculator;
pub use fd_step_condition_engine::{ExerciseRight, FdStepConditionEngine};
pub use fd_vanilla_engine::{grid_limits, safe_grid_points, FdVanillaGrid};
