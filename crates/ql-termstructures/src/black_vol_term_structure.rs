//! `BlackVolTermStructure`: Black-volatility term structures.
//!
//! Provides the `BlackVolTermStructure` trait and the flat implementation
//! `BlackConstantVol`.

use crate::term_structure::TermStructure;
use crate::volatility_term_structure::VolatilityTermStructure;
use ql_core::{errors::Result, Real, Time, Volatility};

/// Time shift used when a forward variance is requested over a zero-length
/// interval.
const DT: Time = 1.0e-5;

/// A Black-volatility term structure.
///
/// Implementors must provide **at least one** of:
/// * [`black_vol_impl`](BlackVolTermStructure::black_vol_impl): σ(t, k)
/// * [`black_variance_impl`](BlackVolTermStructure::black_variance_impl): σ²·t
///
/// The other is derived automatically.
pub trait BlackVolTermStructure: VolatilityTermStructure {
    /// Return the Black volatility for time `t` and strike `strike`.
    fn black_vol_impl(&self, t: Time, strike: Real) -> Volatility {
        if t <= 0.0 {
            return self.black_vol_impl(DT, strike);
        }
        let var = self.black_variance_impl(t, strike);
        (var / t).sqrt()
    }

    /// Return the Black variance `σ²·t` for time `t` and strike `strike`.
    fn black_variance_impl(&self, t: Time, strike: Real) -> Real {
        let vol = self.black_vol_impl(t, strike);
        vol * vol * t
    }

    /// Black volatility for a time and strike.
    fn black_vol(&self, t: Time, strike: Real) -> Volatility {
        self.black_vol_impl(t, strike)
    }

    /// Black variance for a time and strike.
    fn black_variance(&self, t: Time, strike: Real) -> Real {
        self.black_variance_impl(t, strike)
    }

    /// Forward variance between `t1` and `t2` for a given strike.
    ///
    /// # Errors
    /// `t2` must not precede `t1`, and the variance must not decrease.
    fn black_forward_variance(&self, t1: Time, t2: Time, strike: Real) -> Result<Real> {
        ql_core::ensure!(t1 <= t2, "t1 ({t1}) is later than t2 ({t2})");
        let v1 = self.black_variance(t1, strike);
        let v2 = self.black_variance(t2, strike);
        ql_core::ensure!(
            v2 >= v1 - 1e-14,
            "variances must be non-decreasing, got {v1} at {t1} and {v2} at {t2}"
        );
        Ok((v2 - v1).max(0.0))
    }

    /// Forward volatility between `t1` and `t2` for a given strike.
    ///
    /// For `t1 == t2` the local forward volatility over a small step is
    /// returned.
    ///
    /// # Errors
    /// See [`black_forward_variance`](Self::black_forward_variance).
    fn black_forward_vol(&self, t1: Time, t2: Time, strike: Real) -> Result<Volatility> {
        if t2 - t1 < DT {
            let var = self.black_forward_variance(t1, t1 + DT, strike)?;
            return Ok((var / DT).sqrt());
        }
        let var = self.black_forward_variance(t1, t2, strike)?;
        Ok((var / (t2 - t1)).sqrt())
    }
}

// ── BlackConstantVol ──────────────────────────────────────────────────────────

/// A flat (constant) Black volatility surface.
///
/// `σ(t, K) = constant` for all `t > 0` and all strikes `K`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackConstantVol {
    volatility: Volatility,
}

impl BlackConstantVol {
    /// Create a constant Black vol surface.
    pub fn new(volatility: Volatility) -> Self {
        Self { volatility }
    }

    /// The constant volatility value.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }
}

impl TermStructure for BlackConstantVol {}

impl VolatilityTermStructure for BlackConstantVol {}

impl BlackVolTermStructure for BlackConstantVol {
    fn black_vol_impl(&self, _t: Time, _strike: Real) -> Volatility {
        self.volatility
    }

    fn black_variance_impl(&self, t: Time, _strike: Real) -> Real {
        self.volatility * self.volatility * t
    }
}
