//! Tridiagonal operators and the Thomas-algorithm solver.

use ql_core::{errors::Result, Real};
use ql_math::Array;

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands. Used for 1-D finite
/// difference discretisations of second-order PDEs. All three bands have
/// the operator's size; `lower[0]` and `upper[n-1]` are unused.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n−2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// The identity operator of size `n`.
    pub fn identity(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![1.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Set row 0 to `(b, c)`.
    pub fn set_first_row(&mut self, b: Real, c: Real) {
        self.diag[0] = b;
        self.upper[0] = c;
    }

    /// Set row `i` (interior) to `(a, b, c)`.
    pub fn set_mid_row(&mut self, i: usize, a: Real, b: Real, c: Real) {
        self.lower[i] = a;
        self.diag[i] = b;
        self.upper[i] = c;
    }

    /// Set every interior row to `(a, b, c)`.
    pub fn set_mid_rows(&mut self, a: Real, b: Real, c: Real) {
        for i in 1..self.size().saturating_sub(1) {
            self.set_mid_row(i, a, b, c);
        }
    }

    /// Set the last row to `(a, b)`.
    pub fn set_last_row(&mut self, a: Real, b: Real) {
        let n = self.size();
        self.lower[n - 1] = a;
        self.diag[n - 1] = b;
    }

    /// Apply the operator: `y = A · x`.
    ///
    /// # Errors
    /// `x` must have the operator's size.
    pub fn apply_to(&self, x: &Array) -> Result<Array> {
        let n = self.size();
        ql_core::ensure_same_size!(x.size(), n, "operator and array");
        if n == 1 {
            return Ok(Array::from_element(1, self.diag[0] * x[0]));
        }
        let mut y = Array::zeros(n);
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
        Ok(y)
    }

    /// Solve `A · x = rhs` using the Thomas algorithm (LU decomposition
    /// for tridiagonal systems), in `O(n)`.
    ///
    /// # Errors
    /// `rhs` must have the operator's size, and no pivot may vanish.
    pub fn solve_for(&self, rhs: &Array) -> Result<Array> {
        let n = self.size();
        ql_core::ensure_same_size!(rhs.size(), n, "operator and right-hand side");
        ql_core::ensure!(n > 0, "cannot solve an empty system");

        // Forward sweep
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        ql_core::ensure!(self.diag[0] != 0.0, "division by zero in tridiagonal solve");
        c_prime[0] = self.upper[0] / self.diag[0];
        d_prime[0] = rhs[0] / self.diag[0];

        for i in 1..n {
            let m = self.diag[i] - self.lower[i] * c_prime[i - 1];
            ql_core::ensure!(m != 0.0, "division by zero in tridiagonal solve");
            if i < n - 1 {
                c_prime[i] = self.upper[i] / m;
            }
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / m;
        }

        // Back substitution
        let mut x = Array::zeros(n);
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - c_prime[i] * x[i + 1];
        }

        Ok(x)
    }

    /// Scale all entries by a scalar.
    pub fn scale(&mut self, factor: Real) {
        for v in self
            .lower
            .iter_mut()
            .chain(self.diag.iter_mut())
            .chain(self.upper.iter_mut())
        {
            *v *= factor;
        }
    }

    /// Add the identity matrix scaled by `factor`: `A ← A + factor · I`.
    pub fn add_identity(&mut self, factor: Real) {
        for d in &mut self.diag {
            *d += factor;
        }
    }

    /// `I + factor · A`, as used by the θ-scheme parts.
    pub fn identity_plus(&self, factor: Real) -> Self {
        let mut op = self.clone();
        op.scale(factor);
        op.add_identity(1.0);
        op
    }
}
