//! Generalized Black-Scholes process.
//!
//! `dS/S = (r(t) − q(t)) dt + σ(t) dW`
//!
//! where `r` is the risk-free rate, `q` the continuous dividend yield and
//! `σ` is read from a Black volatility term structure. As a
//! [`StochasticProcess1D`] the process is expressed in `x = ln S`, which is
//! the variable the finite-difference grids are uniform in.

use crate::stochastic_process::StochasticProcess1D;
use ql_core::{DiscountFactor, Real, Time};
use ql_termstructures::{BlackVolTermStructure, FlatForward, YieldTermStructure};
use std::sync::Arc;

/// A generalized Black-Scholes stochastic process.
///
/// The term structures are shared behind `Arc`s so that one process can be
/// handed to several engines, possibly running on different threads.
#[derive(Debug, Clone)]
pub struct GeneralizedBlackScholesProcess {
    x0: Real,
    risk_free_rate: Arc<dyn YieldTermStructure>,
    dividend_yield: Arc<dyn YieldTermStructure>,
    black_vol: Arc<dyn BlackVolTermStructure>,
}

impl GeneralizedBlackScholesProcess {
    /// Create a new process from a spot and its market curves.
    pub fn new(
        x0: Real,
        risk_free_rate: Arc<dyn YieldTermStructure>,
        dividend_yield: Arc<dyn YieldTermStructure>,
        black_vol: Arc<dyn BlackVolTermStructure>,
    ) -> Self {
        Self {
            x0,
            risk_free_rate,
            dividend_yield,
            black_vol,
        }
    }

    /// The spot price.
    pub fn spot(&self) -> Real {
        self.x0
    }

    /// The risk-free rate term structure.
    pub fn risk_free_rate(&self) -> &dyn YieldTermStructure {
        &*self.risk_free_rate
    }

    /// The dividend yield term structure.
    pub fn dividend_yield(&self) -> &dyn YieldTermStructure {
        &*self.dividend_yield
    }

    /// The Black volatility surface.
    pub fn black_volatility(&self) -> &dyn BlackVolTermStructure {
        &*self.black_vol
    }

    /// Forward price of the underlying for delivery at `t`.
    pub fn forward(&self, t: Time) -> Real {
        self.x0 * self.dividend_yield.discount(t) / self.risk_free_rate.discount(t)
    }

    /// Risk-free discount factor to `t`.
    pub fn discount(&self, t: Time) -> DiscountFactor {
        self.risk_free_rate.discount(t)
    }

    /// Instantaneous volatility at `t`, taken from the forward variance of
    /// the Black surface.
    fn local_vol(&self, t: Time, x: Real) -> Real {
        let strike = x.exp();
        match self.black_vol.black_forward_vol(t, t, strike) {
            Ok(vol) => vol,
            Err(_) => self.black_vol.black_vol(t, strike),
        }
    }
}

impl StochasticProcess1D for GeneralizedBlackScholesProcess {
    /// `ln S₀`.
    fn x0(&self) -> Real {
        self.x0.ln()
    }

    /// Log-price drift `r(t) − q(t) − σ²(t)/2`, from instantaneous forwards.
    fn drift(&self, t: Time, x: Real) -> Real {
        let sigma = self.local_vol(t, x);
        let r = self.risk_free_rate.forward_rate(t, t);
        let q = self.dividend_yield.forward_rate(t, t);
        r - q - 0.5 * sigma * sigma
    }

    fn diffusion(&self, t: Time, x: Real) -> Real {
        self.local_vol(t, x)
    }
}

// ── Convenience constructors ──────────────────────────────────────────────────

/// A Black-Scholes process with no dividends (`q = 0`).
pub fn black_scholes_process(
    x0: Real,
    risk_free_rate: Arc<dyn YieldTermStructure>,
    black_vol: Arc<dyn BlackVolTermStructure>,
) -> GeneralizedBlackScholesProcess {
    let zero_yield: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::new(0.0));
    GeneralizedBlackScholesProcess::new(x0, risk_free_rate, zero_yield, black_vol)
}

/// A Black-Scholes-Merton process with continuous dividend yield.
pub fn black_scholes_merton_process(
    x0: Real,
    risk_free_rate: Arc<dyn YieldTermStructure>,
    dividend_yield: Arc<dyn YieldTermStructure>,
    black_vol: Arc<dyn BlackVolTermStructure>,
) -> GeneralizedBlackScholesProcess {
    GeneralizedBlackScholesProcess::new(x0, risk_free_rate, dividend_yield, black_vol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_termstructures::{BlackConstantVol, BlackVarianceCurve};

    fn make_bsm() -> GeneralizedBlackScholesProcess {
        black_scholes_merton_process(
            100.0,
            Arc::new(FlatForward::new(0.05)),
            Arc::new(FlatForward::new(0.02)),
            Arc::new(BlackConstantVol::new(0.20)),
        )
    }

    #[test]
    fn bsm_initial_values() {
        let p = make_bsm();
        assert_abs_diff_eq!(p.spot(), 100.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.x0(), 100f64.ln(), epsilon = 1e-15);
    }

    #[test]
    fn bsm_log_drift_and_diffusion() {
        let p = make_bsm();
        // r - q - σ²/2 = 0.05 - 0.02 - 0.02
        assert_abs_diff_eq!(p.drift(0.5, p.x0()), 0.01, epsilon = 1e-8);
        assert_abs_diff_eq!(p.diffusion(0.5, p.x0()), 0.20, epsilon = 1e-8);
    }

    #[test]
    fn bsm_forward_and_discount() {
        let p = make_bsm();
        assert_abs_diff_eq!(p.forward(1.0), 100.0 * (0.03_f64).exp(), epsilon = 1e-10);
        assert_abs_diff_eq!(p.discount(2.0), (-0.1_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn local_vol_follows_the_variance_curve() {
        let vol = Arc::new(BlackVarianceCurve::new(&[1.0, 2.0], &[0.2, 0.3]).unwrap());
        let p = black_scholes_process(100.0, Arc::new(FlatForward::new(0.05)), vol);
        // forward variance on [1, 2] is 0.14 per year
        assert_abs_diff_eq!(p.diffusion(1.5, p.x0()), 0.14_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn black_scholes_no_div() {
        let p = black_scholes_process(
            100.0,
            Arc::new(FlatForward::new(0.05)),
            Arc::new(BlackConstantVol::new(0.20)),
        );
        assert_abs_diff_eq!(p.dividend_yield().zero_rate(1.0), 0.0, epsilon = 1e-15);
    }
}
