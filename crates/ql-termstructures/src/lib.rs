//! # ql-termstructures
//!
//! Yield curves and Black volatility term structures, parameterised by year
//! fractions measured from the valuation time `t = 0`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure`: base trait for all term structures.
pub mod term_structure;

/// `YieldTermStructure`: interest-rate and dividend-yield curves.
pub mod yield_term_structure;

/// `FlatForward`: constant forward-rate yield curve.
pub mod flat_forward;

/// `InterpolatedZeroCurve`: zero-rate interpolated yield curve.
pub mod interpolated_zero_curve;

/// `VolatilityTermStructure`: base trait for volatility term structures.
pub mod volatility_term_structure;

/// `BlackVolTermStructure`: Black-volatility term structures and `BlackConstantVol`.
pub mod black_vol_term_structure;

/// `BlackVarianceCurve`: strike-independent variance interpolated in time.
pub mod black_variance_curve;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use black_variance_curve::BlackVarianceCurve;
pub use black_vol_term_structure::{BlackConstantVol, BlackVolTermStructure};
pub use flat_forward::FlatForward;
pub use interpolated_zero_curve::{CubicNatural, InterpolatedZeroCurve, InterpolationBuilder, Linear};
pub use term_structure::TermStructure;
pub use volatility_term_structure::VolatilityTermStructure;
pub use yield_term_structure::YieldTermStructure;
