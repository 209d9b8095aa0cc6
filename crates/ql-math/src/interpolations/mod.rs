//! 1D interpolation trait and the two schemes the library relies on:
//! piecewise-linear (term-structure nodes) and the natural cubic spline
//! (re-sampling finite-difference price curves).

use ql_core::{errors::Result, Real};

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Evaluate the interpolation at `x`.
    ///
    /// Outside `[x_min, x_max]` the boundary segment is extended.
    fn operator(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Binary search: find `i` such that `xs[i] <= x < xs[i+1]`, clamped to the
/// first and last segment.
fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    xs.partition_point(|&xi| xi <= x) - 1
}

fn check_nodes(xs: &[Real], ys: &[Real], min_points: usize) -> Result<()> {
    ql_core::ensure!(
        xs.len() >= min_points,
        "need at least {min_points} points for interpolation, got {}",
        xs.len()
    );
    ql_core::ensure_same_size!(xs.len(), ys.len(), "interpolation abscissae and ordinates");
    ql_core::ensure!(
        xs.windows(2).all(|w| w[1] > w[0]),
        "interpolation abscissae must be strictly increasing"
    );
    Ok(())
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from sorted `xs` and corresponding `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices have different lengths, fewer than 2
    /// points, or unsorted abscissae.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys, 2)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }
}

impl Interpolation1D for LinearInterpolation {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = self.xs[i + 1] - self.xs[i];
        self.ys[i] + (x - self.xs[i]) * (self.ys[i + 1] - self.ys[i]) / dx
    }
}

// ── Natural cubic spline ──────────────────────────────────────────────────────

/// Cubic spline with vanishing second derivative at both ends.
///
/// Beyond the end nodes the spline continues linearly with the end slope,
/// which is what a natural spline's boundary condition implies.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    /// Second derivatives at the nodes.
    m: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Build a natural cubic spline through the given nodes.
    ///
    /// # Errors
    /// Returns an error for fewer than 3 points, mismatched lengths or
    /// unsorted abscissae.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys, 3)?;
        let n = xs.len();
        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        // Interior system for m[1..n-1]:
        // h[i-1] m[i-1] + 2 (h[i-1] + h[i]) m[i] + h[i] m[i+1] = 6 (s[i] - s[i-1])
        let k = n - 2;
        let mut c_prime = vec![0.0; k];
        let mut d_prime = vec![0.0; k];
        for j in 0..k {
            let i = j + 1;
            let lower = if j > 0 { h[i - 1] } else { 0.0 };
            let diag = 2.0 * (h[i - 1] + h[i]);
            let upper = h[i];
            let rhs = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
            let (prev_c, prev_d) = if j > 0 {
                (c_prime[j - 1], d_prime[j - 1])
            } else {
                (0.0, 0.0)
            };
            let denom = diag - lower * prev_c;
            c_prime[j] = upper / denom;
            d_prime[j] = (rhs - lower * prev_d) / denom;
        }

        let mut m = vec![0.0; n];
        for j in (0..k).rev() {
            let next = if j + 1 < k { m[j + 2] } else { 0.0 };
            m[j + 1] = d_prime[j] - c_prime[j] * next;
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    fn end_slope(&self, i: usize, at_right: bool) -> Real {
        let h = self.xs[i + 1] - self.xs[i];
        let s = (self.ys[i + 1] - self.ys[i]) / h;
        if at_right {
            s + h * (2.0 * self.m[i + 1] + self.m[i]) / 6.0
        } else {
            s - h * (2.0 * self.m[i] + self.m[i + 1]) / 6.0
        }
    }
}

impl Interpolation1D for CubicNaturalSpline {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        let n = self.xs.len();
        if x < self.xs[0] {
            return self.ys[0] + (x - self.xs[0]) * self.end_slope(0, false);
        }
        if x > self.xs[n - 1] {
            return self.ys[n - 1] + (x - self.xs[n - 1]) * self.end_slope(n - 2, true);
        }
        let i = locate(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_interpolation() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 4.0];
        let interp = LinearInterpolation::new(&xs, &ys).unwrap();
        assert!((interp.operator(0.5) - 0.5).abs() < 1e-12);
        assert!((interp.operator(1.5) - 2.5).abs() < 1e-12);
        // extrapolation continues the end segments
        assert!((interp.operator(3.0) - 7.0).abs() < 1e-12);
        assert!((interp.operator(-1.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_nodes() {
        assert!(LinearInterpolation::new(&[0.0, 1.0], &[0.0]).is_err());
        assert!(LinearInterpolation::new(&[1.0, 0.0], &[0.0, 1.0]).is_err());
        assert!(CubicNaturalSpline::new(&[0.0, 1.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn spline_passes_through_nodes() {
        let xs = [0.0, 0.5, 1.0, 2.0, 3.0];
        let ys = [1.0, 0.98, 0.95, 0.88, 0.80];
        let spline = CubicNaturalSpline::new(&xs, &ys).unwrap();
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            assert!((spline.operator(x) - y).abs() < 1e-12, "at x={x}");
        }
    }

    #[test]
    fn spline_reproduces_straight_lines() {
        let xs = [0.0, 0.3, 1.0, 1.7, 2.0];
        let ys: Vec<Real> = xs.iter().map(|x| 2.0 * x - 1.0).collect();
        let spline = CubicNaturalSpline::new(&xs, &ys).unwrap();
        for x in [-0.5, 0.1, 0.65, 1.9, 2.5] {
            assert!((spline.operator(x) - (2.0 * x - 1.0)).abs() < 1e-12, "at x={x}");
        }
    }

    #[test]
    fn spline_tracks_smooth_function() {
        let xs: Vec<Real> = (0..=40).map(|i| i as Real * 0.1).collect();
        let ys: Vec<Real> = xs.iter().map(|x| x.sin()).collect();
        let spline = CubicNaturalSpline::new(&xs, &ys).unwrap();
        for x in [0.55, 1.234, 2.71, 3.33] {
            assert!((spline.operator(x) - x.sin()).abs() < 1e-4, "at x={x}");
        }
    }
}
