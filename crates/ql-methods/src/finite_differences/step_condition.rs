//! Discrete events applied to a value grid during rollback.
//!
//! A condition is invoked after every landing of the rollback, including
//! the intermediate landings on stopping times, and decides for itself
//! whether it has anything to do at that time.

use ql_cashflows::Dividend;
use ql_core::{errors::Result, Rate, Real, Time};
use ql_math::{close, Array, Interpolation1D, SampledCurve};

fn on_time(t: Time, scheduled: Time) -> bool {
    close(t, scheduled, 1e-10 * scheduled.abs().max(1.0))
}

fn floor_with(a: &mut Array, floor: impl Fn(usize) -> Real) {
    for (i, v) in a.iter_mut().enumerate() {
        *v = v.max(floor(i));
    }
}

/// A step condition.
#[derive(Debug, Clone, PartialEq)]
pub enum StepCondition {
    /// Does nothing.
    Null,
    /// Early exercise at any time: `a ← max(a, intrinsic)`.
    AmericanExercise {
        /// Immediate-exercise value at each grid level.
        intrinsic: Array,
    },
    /// Early exercise on a schedule.
    BermudanExercise {
        /// Immediate-exercise value at each grid level.
        intrinsic: Array,
        /// Exercise times.
        times: Vec<Time>,
    },
    /// The holder may lock in the intrinsic value, paid at the horizon.
    Shout {
        /// Intrinsic value at each grid level.
        intrinsic: Array,
        /// Time of the payment.
        residual_time: Time,
        /// Continuously compounded discount rate to the payment time.
        rate: Rate,
    },
    /// Discrete dividends paid by the underlying.
    Dividend {
        /// Underlying level at each grid point, increasing and positive.
        grid: Array,
        /// The dividends; only those falling on the current time act.
        dividends: Vec<Dividend>,
    },
    /// Several conditions applied in order.
    Composite(Vec<StepCondition>),
}

impl StepCondition {
    /// American exercise against the given intrinsic values.
    pub fn american(intrinsic: Array) -> Self {
        Self::AmericanExercise { intrinsic }
    }

    /// Bermudan exercise at `times`.
    pub fn bermudan(intrinsic: Array, times: Vec<Time>) -> Self {
        Self::BermudanExercise { intrinsic, times }
    }

    /// Shout right with payment at `residual_time`.
    pub fn shout(intrinsic: Array, residual_time: Time, rate: Rate) -> Self {
        Self::Shout {
            intrinsic,
            residual_time,
            rate,
        }
    }

    /// Dividend jumps on `grid`.
    pub fn dividends(grid: Array, dividends: Vec<Dividend>) -> Self {
        Self::Dividend { grid, dividends }
    }

    /// Times at which the rollback must land exactly.
    pub fn stopping_times(&self) -> Vec<Time> {
        match self {
            Self::Null | Self::AmericanExercise { .. } | Self::Shout { .. } => Vec::new(),
            Self::BermudanExercise { times, .. } => times.clone(),
            Self::Dividend { dividends, .. } => dividends.iter().map(Dividend::time).collect(),
            Self::Composite(conditions) => {
                conditions.iter().flat_map(StepCondition::stopping_times).collect()
            }
        }
    }

    /// Apply the condition to `a` at time `t`.
    ///
    /// # Errors
    /// Size mismatches between `a` and the condition's arrays, or a grid
    /// that cannot be interpolated.
    pub fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        match self {
            Self::Null => {}
            Self::AmericanExercise { intrinsic } => {
                ql_core::ensure_same_size!(a.size(), intrinsic.size(), "values and intrinsic values");
                floor_with(a, |i| intrinsic[i]);
            }
            Self::BermudanExercise { intrinsic, times } => {
                ql_core::ensure_same_size!(a.size(), intrinsic.size(), "values and intrinsic values");
                if times.iter().any(|&s| on_time(t, s)) {
                    floor_with(a, |i| intrinsic[i]);
                }
            }
            Self::Shout {
                intrinsic,
                residual_time,
                rate,
            } => {
                ql_core::ensure_same_size!(a.size(), intrinsic.size(), "values and intrinsic values");
                let discount = (-rate * (residual_time - t)).exp();
                floor_with(a, |i| discount * intrinsic[i]);
            }
            Self::Dividend { grid, dividends } => {
                for dividend in dividends.iter().filter(|d| on_time(t, d.time())) {
                    apply_dividend(grid, a, dividend)?;
                }
            }
            Self::Composite(conditions) => {
                for condition in conditions {
                    condition.apply_to(a, t)?;
                }
            }
        }
        Ok(())
    }
}

/// Cum-dividend values from ex-dividend ones: `V(S) ← V(S − D(S))`.
fn apply_dividend(grid: &Array, a: &mut Array, dividend: &Dividend) -> Result<()> {
    let curve = SampledCurve::from_parts(grid.clone(), a.clone())?;
    let spline = curve.log_spline()?;
    let (s0, s1) = (grid[0], grid[1]);
    let slope = (a[1] - a[0]) / (s1 - s0);
    let ex = a.clone();
    for (i, v) in a.iter_mut().enumerate() {
        let d = dividend.amount(grid[i]);
        if d == 0.0 {
            continue;
        }
        let shifted = grid[i] - d;
        *v = if shifted < s0 || shifted <= 0.0 {
            ex[0] + (shifted - s0) * slope
        } else {
            spline.operator(shifted.ln())
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_grid(n: usize) -> Array {
        let mut c = SampledCurve::new(n);
        c.set_log_grid(50.0, 200.0).unwrap();
        c.grid().clone()
    }

    #[test]
    fn american_floors_every_time() {
        let cond = StepCondition::american(Array::from_slice(&[3.0, 1.0, 0.0]));
        let mut a = Array::from_slice(&[2.0, 2.0, 2.0]);
        cond.apply_to(&mut a, 0.3).unwrap();
        assert_eq!(a.as_slice(), &[3.0, 2.0, 2.0]);
    }

    #[test]
    fn bermudan_acts_only_on_schedule() {
        let cond = StepCondition::bermudan(Array::from_element(2, 5.0), vec![0.25, 0.5]);
        let mut a = Array::from_element(2, 1.0);
        cond.apply_to(&mut a, 0.3).unwrap();
        assert_eq!(a.as_slice(), &[1.0, 1.0]);
        cond.apply_to(&mut a, 0.5).unwrap();
        assert_eq!(a.as_slice(), &[5.0, 5.0]);
        assert_eq!(cond.stopping_times(), vec![0.25, 0.5]);
    }

    #[test]
    fn shout_floor_is_discounted_to_the_horizon() {
        let cond = StepCondition::shout(Array::from_element(1, 10.0), 1.0, 0.05);
        let mut a = Array::zeros(1);
        cond.apply_to(&mut a, 0.5).unwrap();
        assert!((a[0] - 10.0 * (-0.025f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn dividend_shifts_values_down_the_grid() {
        let grid = log_grid(101);
        let mut a = grid.map(|s| s.ln());
        let cond = StepCondition::dividends(grid.clone(), vec![Dividend::fixed(5.0, 0.5)]);
        cond.apply_to(&mut a, 0.5).unwrap();
        for i in 1..grid.size() {
            let s = grid[i] - 5.0;
            if s > grid[0] {
                assert!((a[i] - s.ln()).abs() < 1e-6, "at {}", grid[i]);
            }
        }
    }

    #[test]
    fn dividend_outside_its_time_does_nothing() {
        let grid = log_grid(11);
        let before = grid.map(|s| s * 0.5);
        let mut a = before.clone();
        let cond = StepCondition::dividends(grid, vec![Dividend::fractional(0.1, 0.5)]);
        cond.apply_to(&mut a, 0.4).unwrap();
        assert_eq!(a, before);
    }

    #[test]
    fn below_the_grid_values_extrapolate_linearly() {
        let grid = log_grid(11);
        let mut a = grid.map(|s| 2.0 * s - 1.0);
        let cond = StepCondition::dividends(grid.clone(), vec![Dividend::fixed(1.0, 0.0)]);
        cond.apply_to(&mut a, 0.0).unwrap();
        assert!((a[0] - (2.0 * (grid[0] - 1.0) - 1.0)).abs() < 1e-10);
    }

    #[test]
    fn composite_applies_in_order() {
        let grid = log_grid(11);
        let intrinsic = grid.map(|s| (s - 100.0).max(0.0));
        let cond = StepCondition::Composite(vec![
            StepCondition::dividends(grid.clone(), vec![Dividend::fixed(1.0, 0.5)]),
            StepCondition::american(intrinsic.clone()),
        ]);
        let mut a = Array::zeros(11);
        cond.apply_to(&mut a, 0.5).unwrap();
        assert_eq!(a, intrinsic);
        assert_eq!(cond.stopping_times(), vec![0.5]);
    }

    #[test]
    fn size_mismatch_is_reported() {
        let cond = StepCondition::american(Array::zeros(3));
        assert!(cond.apply_to(&mut Array::zeros(4), 0.0).is_err());
    }
}
