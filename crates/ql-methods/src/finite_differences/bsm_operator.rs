//! Black-Scholes-Merton spatial operators on a uniform log-price grid.
//!
//! With `x = ln S` and time running backward from maturity, the value
//! satisfies `∂V/∂τ = ½σ²·V_xx + ν·V_x − r·V` with `ν = r − q − ½σ²`.
//! The operators built here are `L = −(½σ²·D₊D₋ + ν·D₀ − r)`, so that one
//! backward step of size `dt` reads `V(t − dt) ≈ (I − dt·L)·V(t)`.
//!
//! Only interior rows are filled; the first and last rows belong to the
//! boundary conditions.

use super::tridiagonal_operator::TridiagonalOperator;
use ql_core::{errors::Result, Rate, Real, Time, Volatility};
use ql_math::Array;
use ql_processes::{GeneralizedBlackScholesProcess, StochasticProcess1D};
use std::sync::Arc;

fn mid_row(dx: Real, r: Rate, sigma2: Real, nu: Real) -> (Real, Real, Real) {
    let pd = -(sigma2 / dx - nu) / (2.0 * dx);
    let pu = -(sigma2 / dx + nu) / (2.0 * dx);
    let pm = sigma2 / (dx * dx) + r;
    (pd, pm, pu)
}

fn check_grid(size: usize, dx: Real) -> Result<()> {
    ql_core::ensure!(size >= 3, "a grid needs at least 3 points, got {size}");
    ql_core::ensure!(dx > 0.0 && dx.is_finite(), "invalid grid spacing {dx}");
    Ok(())
}

/// Constant-coefficient BSM operator.
///
/// # Errors
/// Fewer than 3 points or a non-positive spacing.
pub fn bsm_operator(
    size: usize,
    dx: Real,
    r: Rate,
    q: Rate,
    sigma: Volatility,
) -> Result<TridiagonalOperator> {
    check_grid(size, dx)?;
    let sigma2 = sigma * sigma;
    let nu = r - q - 0.5 * sigma2;
    let (pd, pm, pu) = mid_row(dx, r, sigma2, nu);
    let mut op = TridiagonalOperator::new(size);
    op.set_mid_rows(pd, pm, pu);
    Ok(op)
}

/// BSM operator whose coefficients are read from a process at each time.
///
/// At time `t` the discount rate is the instantaneous risk-free forward and
/// the drift and diffusion of `ln S` come from the process, point by point.
#[derive(Debug, Clone)]
pub struct BsmTermOperator {
    log_grid: Array,
    dx: Real,
    process: Arc<GeneralizedBlackScholesProcess>,
}

impl BsmTermOperator {
    /// Build the operator on a uniform grid of `ln S` values.
    ///
    /// # Errors
    /// Fewer than 3 points or a non-increasing grid.
    pub fn new(log_grid: Array, process: Arc<GeneralizedBlackScholesProcess>) -> Result<Self> {
        let n = log_grid.size();
        ql_core::ensure!(n >= 3, "a grid needs at least 3 points, got {n}");
        let dx = (log_grid.back() - log_grid.front()) / (n - 1) as Real;
        check_grid(n, dx)?;
        Ok(Self {
            log_grid,
            dx,
            process,
        })
    }

    /// Number of grid points.
    pub fn size(&self) -> usize {
        self.log_grid.size()
    }

    /// The operator with coefficients frozen at time `t`.
    pub fn at(&self, t: Time) -> TridiagonalOperator {
        let n = self.size();
        let r = self.process.risk_free_rate().forward_rate(t, t);
        let mut op = TridiagonalOperator::new(n);
        for i in 1..n - 1 {
            let x = self.log_grid[i];
            let sigma = self.process.diffusion(t, x);
            let nu = self.process.drift(t, x);
            let (pd, pm, pu) = mid_row(self.dx, r, sigma * sigma, nu);
            op.set_mid_row(i, pd, pm, pu);
        }
        op
    }
}

/// The spatial operator driving one grid of a rollback.
#[derive(Debug, Clone)]
pub enum FdOperator {
    /// Coefficients fixed for the whole rollback.
    Constant(TridiagonalOperator),
    /// Coefficients re-evaluated at every step.
    TimeDependent(BsmTermOperator),
}

impl FdOperator {
    /// Number of grid points the operator acts on.
    pub fn size(&self) -> usize {
        match self {
            Self::Constant(op) => op.size(),
            Self::TimeDependent(op) => op.size(),
        }
    }

    /// Whether the operator must be re-evaluated as time moves.
    pub fn is_time_dependent(&self) -> bool {
        matches!(self, Self::TimeDependent(_))
    }

    /// The operator at time `t`.
    pub fn at(&self, t: Time) -> TridiagonalOperator {
        match self {
            Self::Constant(op) => op.clone(),
            Self::TimeDependent(op) => op.at(t),
        }
    }
}

impl From<TridiagonalOperator> for FdOperator {
    fn from(op: TridiagonalOperator) -> Self {
        Self::Constant(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ql_termstructures::{BlackConstantVol, FlatForward};

    #[test]
    fn constant_operator_coefficients() {
        let (dx, r, q, sigma) = (0.01, 0.05, 0.02, 0.2);
        let op = bsm_operator(5, dx, r, q, sigma).unwrap();
        let nu = r - q - 0.5 * sigma * sigma;
        assert_relative_eq!(op.lower[2], -(0.04 / dx - nu) / (2.0 * dx), max_relative = 1e-14);
        assert_relative_eq!(op.upper[2], -(0.04 / dx + nu) / (2.0 * dx), max_relative = 1e-14);
        assert_relative_eq!(op.diag[2], 0.04 / (dx * dx) + r, max_relative = 1e-14);
        // boundary rows are left to the boundary conditions
        assert_eq!(op.diag[0], 0.0);
        assert_eq!(op.diag[4], 0.0);
    }

    #[test]
    fn operator_annihilates_discounted_forward() {
        // V = S·e^{-q τ} solves the PDE, so L·V = q·V on interior rows
        let dx = 0.001;
        let op = bsm_operator(5, dx, 0.05, 0.02, 0.3).unwrap();
        let v = Array::from_fn(5, |i| (i as Real * dx).exp());
        let lv = op.apply_to(&v).unwrap();
        for i in 1..4 {
            assert_relative_eq!(lv[i], 0.02 * v[i], max_relative = 1e-4);
        }
    }

    #[test]
    fn term_operator_matches_constant_for_flat_market() {
        let process = Arc::new(GeneralizedBlackScholesProcess::new(
            100.0,
            Arc::new(FlatForward::new(0.05)),
            Arc::new(FlatForward::new(0.01)),
            Arc::new(BlackConstantVol::new(0.25)),
        ));
        let grid = Array::from_fn(7, |i| 4.5 + 0.02 * i as Real);
        let term = BsmTermOperator::new(grid, process).unwrap();
        let constant = bsm_operator(7, 0.02, 0.05, 0.01, 0.25).unwrap();
        let at = term.at(0.5);
        for i in 1..6 {
            assert_relative_eq!(at.lower[i], constant.lower[i], max_relative = 1e-6);
            assert_relative_eq!(at.diag[i], constant.diag[i], max_relative = 1e-6);
            assert_relative_eq!(at.upper[i], constant.upper[i], max_relative = 1e-6);
        }
        assert!(FdOperator::TimeDependent(term).is_time_dependent());
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        assert!(bsm_operator(2, 0.1, 0.0, 0.0, 0.2).is_err());
        assert!(bsm_operator(5, 0.0, 0.0, 0.0, 0.2).is_err());
    }
}
