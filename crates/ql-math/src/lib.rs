//! # ql-math
//!
//! Mathematical utilities for the finite-difference engines: the `Array`
//! value vector (over nalgebra), `SampledCurve`, 1D interpolation, normal
//! distributions (error function via statrs) and float comparison helpers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Array`: dense vector of reals.
pub mod array;

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// Values sampled on an underlying-price grid.
pub mod sampled_curve;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use comparison::{close, close_enough};
pub use distributions::{
    normal_cdf, normal_cdf_inverse, normal_pdf, CumulativeNormalDistribution,
    InverseCumulativeNormal, MoroInverseCumulativeNormal, NormalDistribution,
};
pub use interpolations::{CubicNaturalSpline, Interpolation1D, LinearInterpolation};
pub use sampled_curve::SampledCurve;
