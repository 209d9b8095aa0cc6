//! # ql-processes
//!
//! The generalized Black-Scholes-Merton process: spot, risk-free curve,
//! dividend-yield curve and Black volatility, plus the 1D process trait the
//! finite-difference operators read drift and diffusion from.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes_process;
pub mod stochastic_process;

pub use black_scholes_process::{
    black_scholes_merton_process, black_scholes_process, GeneralizedBlackScholesProcess,
};
pub use stochastic_process::StochasticProcess1D;
