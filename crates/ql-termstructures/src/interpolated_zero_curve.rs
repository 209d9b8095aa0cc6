//! `InterpolatedZeroCurve`: a yield term structure defined by zero rates at
//! pillar times.
//!
//! The curve stores (time, zero-rate) pairs and interpolates zero rates as a
//! function of time.  Discount factors are computed as `P(t) = exp(-z(t) * t)`.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{errors::Result, DiscountFactor, Rate, Real, Time};
use ql_math::Interpolation1D;

/// A yield curve defined by zero rates at known times.
///
/// Interpolation of the zero rate is delegated to a pluggable
/// `Interpolation1D` implementation. Past the last pillar the end segment
/// is extended.
#[derive(Debug)]
pub struct InterpolatedZeroCurve {
    times: Vec<Time>,
    rates: Vec<Rate>,
    interp: Box<dyn Interpolation1D>,
}

/// Trait for creating an interpolation from `(xs, ys)` slices.
///
/// This lets callers choose the interpolation method without the curve
/// needing to know the concrete type.
pub trait InterpolationBuilder: std::fmt::Debug {
    /// Build an interpolation from the given x and y values.
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>>;
}

/// Linear interpolation builder.
#[derive(Debug, Clone, Copy)]
pub struct Linear;

impl InterpolationBuilder for Linear {
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(ql_math::LinearInterpolation::new(xs, ys)?))
    }
}

/// Cubic natural spline interpolation builder.
#[derive(Debug, Clone, Copy)]
pub struct CubicNatural;

impl InterpolationBuilder for CubicNatural {
    fn build(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(ql_math::CubicNaturalSpline::new(xs, ys)?))
    }
}

impl InterpolatedZeroCurve {
    /// Build a zero-rate curve from pillar times and zero rates.
    ///
    /// The first time should be `0.0` (its rate sets the short end). Times
    /// must be strictly increasing.
    ///
    /// # Errors
    /// Fewer than two pillars, mismatched lengths, negative or unsorted
    /// times, or a failure of the interpolation builder.
    pub fn new(times: &[Time], rates: &[Rate], builder: &dyn InterpolationBuilder) -> Result<Self> {
        ql_core::ensure!(
            times.len() >= 2,
            "need at least 2 pillars (reference + 1 pillar)"
        );
        ql_core::ensure_same_size!(times.len(), rates.len(), "zero-curve times and rates");
        ql_core::ensure!(times[0] >= 0.0, "first pillar time ({}) is negative", times[0]);

        let interp = builder.build(times, rates)?;
        Ok(Self {
            times: times.to_vec(),
            rates: rates.to_vec(),
            interp,
        })
    }

    /// Return the pillar times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Return the pillar zero rates.
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }
}

impl TermStructure for InterpolatedZeroCurve {
    fn max_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }
}

impl YieldTermStructure for InterpolatedZeroCurve {
    fn zero_rate_impl(&self, t: Time) -> Rate {
        self.interp.operator(t)
    }

    fn discount_impl(&self, t: Time) -> DiscountFactor {
        if t == 0.0 {
            return 1.0;
        }
        let z = self.zero_rate_impl(t);
        (-z * t).exp()
    }
}
