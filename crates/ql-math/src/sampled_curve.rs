//! `SampledCurve`: a function sampled on an ordered price grid.
//!
//! Finite-difference engines keep the option value as a sampled curve: the
//! grid holds the underlying levels (usually log-spaced and centred on the
//! spot), the values hold the option price at each level. The curve also
//! carries the central finite-difference estimates of value, delta and
//! gamma used to report pricing results.

use crate::array::Array;
use crate::interpolations::CubicNaturalSpline;
use ql_core::{errors::Result, Real};

/// A set of values sampled on a monotonic grid of underlying levels.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    grid: Array,
    values: Array,
}

impl SampledCurve {
    /// A curve of `grid_size` points with zero grid and values.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid: Array::zeros(grid_size),
            values: Array::zeros(grid_size),
        }
    }

    /// Build a curve from a grid and matching values.
    ///
    /// # Errors
    /// Returns a size-mismatch error if the two arrays differ in length.
    pub fn from_parts(grid: Array, values: Array) -> Result<Self> {
        ql_core::ensure_same_size!(grid.size(), values.size(), "curve grid and values");
        Ok(Self { grid, values })
    }

    /// Number of sample points.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// The underlying levels.
    pub fn grid(&self) -> &Array {
        &self.grid
    }

    /// The sampled values.
    pub fn values(&self) -> &Array {
        &self.values
    }

    /// Grid level at index `i`.
    pub fn grid_value(&self, i: usize) -> Real {
        self.grid[i]
    }

    /// Sampled value at index `i`.
    pub fn value(&self, i: usize) -> Real {
        self.values[i]
    }

    /// Lay out a grid evenly spaced in `ln(S)` between `min` and `max`.
    ///
    /// # Errors
    /// Returns an error unless `0 < min < max`.
    pub fn set_log_grid(&mut self, min: Real, max: Real) -> Result<()> {
        ql_core::ensure!(
            min > 0.0 && max > min,
            "log grid requires 0 < min < max, got [{min}, {max}]"
        );
        let n = self.size();
        let (ln_min, ln_max) = (min.ln(), max.ln());
        let dx = if n > 1 { (ln_max - ln_min) / (n - 1) as Real } else { 0.0 };
        self.grid = Array::from_fn(n, |i| (ln_min + dx * i as Real).exp());
        Ok(())
    }

    /// Set every value to `f(grid level)`.
    pub fn sample<F: Fn(Real) -> Real>(&mut self, f: F) {
        self.values = self.grid.map(f);
    }

    /// Value at the centre of the grid.
    ///
    /// For an odd number of points this is the middle sample; for an even
    /// number it is the average of the two middle samples.
    pub fn value_at_center(&self) -> Real {
        let jmid = self.size() / 2;
        if self.size() % 2 == 1 {
            self.values[jmid]
        } else {
            0.5 * (self.values[jmid] + self.values[jmid - 1])
        }
    }

    /// Grid level at the centre (matching [`value_at_center`](Self::value_at_center)).
    pub fn grid_at_center(&self) -> Real {
        let jmid = self.size() / 2;
        if self.size() % 2 == 1 {
            self.grid[jmid]
        } else {
            0.5 * (self.grid[jmid] + self.grid[jmid - 1])
        }
    }

    /// First derivative with respect to the underlying at the centre.
    ///
    /// # Errors
    /// Requires at least 3 points.
    pub fn first_derivative_at_center(&self) -> Result<Real> {
        ql_core::ensure!(self.size() >= 3, "the size of the curve must be at least 3");
        let (g, v) = (&self.grid, &self.values);
        let jmid = self.size() / 2;
        if self.size() % 2 == 1 {
            Ok((v[jmid + 1] - v[jmid - 1]) / (g[jmid + 1] - g[jmid - 1]))
        } else {
            Ok((v[jmid] - v[jmid - 1]) / (g[jmid] - g[jmid - 1]))
        }
    }

    /// Second derivative with respect to the underlying at the centre.
    ///
    /// # Errors
    /// Requires at least 4 points.
    pub fn second_derivative_at_center(&self) -> Result<Real> {
        ql_core::ensure!(self.size() >= 4, "the size of the curve must be at least 4");
        let (g, v) = (&self.grid, &self.values);
        let jmid = self.size() / 2;
        if self.size() % 2 == 1 {
            let delta_plus = (v[jmid + 1] - v[jmid]) / (g[jmid + 1] - g[jmid]);
            let delta_minus = (v[jmid] - v[jmid - 1]) / (g[jmid] - g[jmid - 1]);
            let ds = 0.5 * (g[jmid + 1] - g[jmid - 1]);
            Ok((delta_plus - delta_minus) / ds)
        } else {
            let delta_plus = (v[jmid + 1] - v[jmid - 1]) / (g[jmid + 1] - g[jmid - 1]);
            let delta_minus = (v[jmid] - v[jmid - 2]) / (g[jmid] - g[jmid - 2]);
            Ok((delta_plus - delta_minus) / (g[jmid] - g[jmid - 1]))
        }
    }

    /// Spline interpolant of the values against `ln(grid)`.
    ///
    /// # Errors
    /// Requires a strictly increasing, positive grid of at least 3 points.
    pub fn log_spline(&self) -> Result<CubicNaturalSpline> {
        ql_core::ensure!(
            self.grid.size() > 0 && self.grid[0] > 0.0,
            "log-price interpolation needs a positive grid"
        );
        let log_grid: Vec<Real> = self.grid.iter().map(|s| s.ln()).collect();
        CubicNaturalSpline::new(&log_grid, self.values.as_slice())
    }
}
