//! `BlackVarianceCurve`: a strike-independent Black volatility term
//! structure.
//!
//! Volatilities quoted at a set of expiries are turned into total variances
//! `σ²·t`, which are interpolated linearly in time. The variance at `t = 0`
//! is zero; past the last expiry the last volatility is held flat.

use crate::black_vol_term_structure::BlackVolTermStructure;
use crate::term_structure::TermStructure;
use crate::volatility_term_structure::VolatilityTermStructure;
use ql_core::{errors::Result, Real, Time, Volatility};
use ql_math::{Interpolation1D, LinearInterpolation};

/// Black volatility term structure interpolating total variance in time.
#[derive(Debug, Clone)]
pub struct BlackVarianceCurve {
    times: Vec<Time>,
    variances: Vec<Real>,
    interp: LinearInterpolation,
}

impl BlackVarianceCurve {
    /// Build the curve from expiry times and the Black volatilities quoted
    /// for them.
    ///
    /// # Errors
    /// Mismatched lengths, non-positive or unsorted times, or total
    /// variances that decrease with time.
    pub fn new(times: &[Time], volatilities: &[Volatility]) -> Result<Self> {
        ql_core::ensure_same_size!(times.len(), volatilities.len(), "expiry times and volatilities");
        ql_core::ensure!(!times.is_empty(), "at least one expiry is required");
        ql_core::ensure!(times[0] > 0.0, "cannot have times[0] <= 0");

        let mut xs = Vec::with_capacity(times.len() + 1);
        let mut variances = Vec::with_capacity(times.len() + 1);
        xs.push(0.0);
        variances.push(0.0);
        for (&t, &vol) in times.iter().zip(volatilities.iter()) {
            let var = vol * vol * t;
            ql_core::ensure!(
                var >= variances[variances.len() - 1],
                "variance must be non-decreasing, violated at t = {t}"
            );
            xs.push(t);
            variances.push(var);
        }

        let interp = LinearInterpolation::new(&xs, &variances)?;
        Ok(Self {
            times: xs,
            variances,
            interp,
        })
    }

    /// Expiry times, including the leading `0.0`.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Total variances at [`times`](Self::times).
    pub fn variances(&self) -> &[Real] {
        &self.variances
    }
}

impl TermStructure for BlackVarianceCurve {
    fn max_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }
}

impl VolatilityTermStructure for BlackVarianceCurve {}

impl BlackVolTermStructure for BlackVarianceCurve {
    fn black_variance_impl(&self, t: Time, _strike: Real) -> Real {
        let t_max = self.max_time();
        if t <= t_max {
            self.interp.operator(t.max(0.0))
        } else {
            // flat volatility extrapolation
            self.variances[self.variances.len() - 1] * t / t_max
        }
    }
}
