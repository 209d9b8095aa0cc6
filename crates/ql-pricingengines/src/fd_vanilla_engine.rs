//! Grid, operator and boundary set-up shared by finite-difference vanilla
//! engines.
//!
//! The grid is evenly spaced in `ln S` and centred geometrically on the
//! spot. Its half-width is four standard deviations (plus a small
//! correction for short-dated or low-volatility options), widened if
//! needed so that the strike sits well inside.

use ql_core::{errors::Result, Real, Size, Time};
use ql_instruments::Payoff;
use ql_math::{Array, SampledCurve};
use ql_methods::{bsm_operator, BoundaryConditionSet, BsmTermOperator, FdOperator, FdmSettings};
use ql_processes::GeneralizedBlackScholesProcess;
use ql_termstructures::{BlackVolTermStructure, YieldTermStructure};
use std::sync::Arc;

/// The strike must lie within `[sMin·1.1, sMax/1.1]`.
const SAFETY_ZONE_FACTOR: Real = 1.1;
const MIN_GRID_POINTS: Size = 10;
const GRID_POINTS_PER_YEAR: Real = 2.0;

/// Grid size actually used for an option with `residual_time` to expiry.
pub fn safe_grid_points(grid_points: Size, residual_time: Time) -> Size {
    let minimum = if residual_time > 1.0 {
        MIN_GRID_POINTS + ((residual_time - 1.0) * GRID_POINTS_PER_YEAR) as Size
    } else {
        MIN_GRID_POINTS
    };
    grid_points.max(minimum)
}

/// Lower and upper grid levels around `center`.
///
/// # Errors
/// Non-positive centre or residual time, or a vanishing volatility.
pub fn grid_limits(
    process: &GeneralizedBlackScholesProcess,
    center: Real,
    residual_time: Time,
    strike: Option<Real>,
) -> Result<(Real, Real)> {
    ql_core::ensure!(center > 0.0, "negative or null underlying given");
    ql_core::ensure!(residual_time > 0.0, "negative or zero residual time");
    let vol_sqrt_time = process
        .black_volatility()
        .black_variance(residual_time, center)
        .sqrt();
    ql_core::ensure!(
        vol_sqrt_time > 0.0 && vol_sqrt_time.is_finite(),
        "degenerate volatility over the residual time: {vol_sqrt_time}"
    );

    // the prefactor fine-tunes performance at small volatilities
    let prefactor = 1.0 + 0.02 / vol_sqrt_time;
    let min_max_factor = (4.0 * prefactor * vol_sqrt_time).exp();
    let mut s_min = center / min_max_factor;
    let mut s_max = center * min_max_factor;

    if let Some(strike) = strike {
        if s_min > strike / SAFETY_ZONE_FACTOR {
            s_min = strike / SAFETY_ZONE_FACTOR;
            // enforce central placement of the underlying
            s_max = center / (s_min / center);
        }
        if s_max < strike * SAFETY_ZONE_FACTOR {
            s_max = strike * SAFETY_ZONE_FACTOR;
            s_min = center / (s_max / center);
        }
    }
    Ok((s_min, s_max))
}

/// The discretised pricing problem for one vanilla option.
#[derive(Debug, Clone)]
pub struct FdVanillaGrid {
    /// Payoff sampled on the log-spaced price grid.
    pub intrinsic: SampledCurve,
    /// Spatial operator.
    pub operator: FdOperator,
    /// Neumann conditions matching the payoff slope at both edges.
    pub bcs: BoundaryConditionSet,
    /// Time to expiry.
    pub residual_time: Time,
}

impl FdVanillaGrid {
    /// Build the grid, operator and boundary conditions.
    ///
    /// The constant operator uses the zero rates to expiry and the Black
    /// volatility at the spot; the time-dependent one reads the process at
    /// every step.
    ///
    /// # Errors
    /// See [`grid_limits`]; also rejects invalid settings.
    pub fn new(
        process: &Arc<GeneralizedBlackScholesProcess>,
        payoff: &dyn Payoff,
        residual_time: Time,
        settings: &FdmSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let spot = process.spot();
        let strike = payoff.as_striked().map(|p| p.strike());
        let (s_min, s_max) = grid_limits(process, spot, residual_time, strike)?;
        let points = safe_grid_points(settings.grid_points, residual_time);

        let mut intrinsic = SampledCurve::new(points);
        intrinsic.set_log_grid(s_min, s_max)?;
        intrinsic.sample(|s| payoff.value(s));

        #[cfg(feature = "logging")]
        tracing::debug!(s_min, s_max, points, residual_time, "finite-difference grid set up");

        let operator = if settings.time_dependent {
            let log_grid = intrinsic.grid().map(Real::ln);
            FdOperator::TimeDependent(BsmTermOperator::new(log_grid, Arc::clone(process))?)
        } else {
            let dx = (s_max / s_min).ln() / (points - 1) as Real;
            let r = process.risk_free_rate().zero_rate(residual_time);
            let q = process.dividend_yield().zero_rate(residual_time);
            let sigma = process.black_volatility().black_vol(residual_time, spot);
            FdOperator::Constant(bsm_operator(points, dx, r, q, sigma)?)
        };
        let bcs = BoundaryConditionSet::neumann_from_edges(intrinsic.values());

        Ok(Self {
            intrinsic,
            operator,
            bcs,
            residual_time,
        })
    }

    /// The price levels.
    pub fn grid(&self) -> &Array {
        self.intrinsic.grid()
    }
}
