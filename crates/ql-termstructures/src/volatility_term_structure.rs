//! `VolatilityTermStructure`: base trait for volatility term structures.

use crate::term_structure::TermStructure;
use ql_core::Real;

/// Base trait for all volatility term structures.
///
/// Extends `TermStructure` with the strike range over which the volatility
/// is defined.
pub trait VolatilityTermStructure: TermStructure {
    /// The minimum strike for which the term structure is defined.
    fn min_strike(&self) -> Real {
        Real::NEG_INFINITY
    }

    /// The maximum strike for which the term structure is defined.
    fn max_strike(&self) -> Real {
        Real::INFINITY
    }
}
