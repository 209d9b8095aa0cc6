//! # ql-cashflows
//!
//! Discrete dividends paid by the underlying of an equity option.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dividend;

pub use dividend::{dividend_vector, Dividend, DividendSchedule};
