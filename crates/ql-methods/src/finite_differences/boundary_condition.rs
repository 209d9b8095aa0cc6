//! Boundary conditions at the two edges of a finite-difference grid.
//!
//! A condition hooks into the four phases of a θ-scheme step: before and
//! after the explicit part is applied, and before and after the implicit
//! part is solved. Neumann values are differences between the two edge
//! grid values, not derivatives per unit of price.

use super::tridiagonal_operator::TridiagonalOperator;
use ql_core::Real;
use ql_math::Array;

/// Grid edge a boundary condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The lowest price level (index 0).
    Lower,
    /// The highest price level (index n − 1).
    Upper,
}

/// A condition fixing the value, first difference, or second difference at
/// one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// `u[edge] = value`.
    Dirichlet(Real),
    /// `u[1] − u[0] = value` (lower) or `u[n−1] − u[n−2] = value` (upper).
    Neumann(Real),
    /// `u[0] − 2u[1] + u[2] = value`, mirrored at the upper edge.
    SecondDerivative(Real),
}

impl BoundaryCondition {
    /// Adjust the explicit operator before it is applied.
    pub fn apply_before_applying(&self, side: Side, op: &mut TridiagonalOperator) {
        match (self, side) {
            (Self::Dirichlet(_), Side::Lower) => op.set_first_row(1.0, 0.0),
            (Self::Dirichlet(_), Side::Upper) => op.set_last_row(0.0, 1.0),
            (Self::Neumann(_), Side::Lower) => op.set_first_row(-1.0, 1.0),
            (Self::Neumann(_), Side::Upper) => op.set_last_row(-1.0, 1.0),
            (Self::SecondDerivative(_), Side::Lower) => op.set_first_row(1.0, 0.0),
            (Self::SecondDerivative(_), Side::Upper) => op.set_last_row(0.0, 1.0),
        }
    }

    /// Fix the edge value after the explicit operator has been applied.
    pub fn apply_after_applying(&self, side: Side, u: &mut Array) {
        let n = u.size();
        match (*self, side) {
            (Self::Dirichlet(v), Side::Lower) => u[0] = v,
            (Self::Dirichlet(v), Side::Upper) => u[n - 1] = v,
            (Self::Neumann(v), Side::Lower) => u[0] = u[1] - v,
            (Self::Neumann(v), Side::Upper) => u[n - 1] = u[n - 2] + v,
            (Self::SecondDerivative(v), Side::Lower) => u[0] = 2.0 * u[1] - u[2] + v,
            (Self::SecondDerivative(v), Side::Upper) => {
                u[n - 1] = 2.0 * u[n - 2] - u[n - 3] + v
            }
        }
    }

    /// Adjust the implicit operator and the right-hand side before solving.
    pub fn apply_before_solving(&self, side: Side, op: &mut TridiagonalOperator, rhs: &mut Array) {
        let n = rhs.size();
        match (*self, side) {
            (Self::Dirichlet(v), Side::Lower) => {
                op.set_first_row(1.0, 0.0);
                rhs[0] = v;
            }
            (Self::Dirichlet(v), Side::Upper) => {
                op.set_last_row(0.0, 1.0);
                rhs[n - 1] = v;
            }
            (Self::Neumann(v), Side::Lower) => {
                op.set_first_row(-1.0, 1.0);
                rhs[0] = v;
            }
            (Self::Neumann(v), Side::Upper) => {
                op.set_last_row(-1.0, 1.0);
                rhs[n - 1] = v;
            }
            // the edge row is decoupled here and fixed after the solve
            (Self::SecondDerivative(_), Side::Lower) => op.set_first_row(1.0, 0.0),
            (Self::SecondDerivative(_), Side::Upper) => op.set_last_row(0.0, 1.0),
        }
    }

    /// Fix the edge value after the implicit system has been solved.
    pub fn apply_after_solving(&self, side: Side, u: &mut Array) {
        if let Self::SecondDerivative(_) = self {
            self.apply_after_applying(side, u);
        }
    }
}

/// The pair of conditions closing one grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditionSet {
    /// Condition at the lowest price level.
    pub lower: BoundaryCondition,
    /// Condition at the highest price level.
    pub upper: BoundaryCondition,
}

impl BoundaryConditionSet {
    /// Pair two conditions.
    pub fn new(lower: BoundaryCondition, upper: BoundaryCondition) -> Self {
        Self { lower, upper }
    }

    /// Neumann conditions matching the edge slopes of `values`.
    ///
    /// # Panics
    /// `values` must have at least 2 points.
    pub fn neumann_from_edges(values: &Array) -> Self {
        let n = values.size();
        Self {
            lower: BoundaryCondition::Neumann(values[1] - values[0]),
            upper: BoundaryCondition::Neumann(values[n - 1] - values[n - 2]),
        }
    }

    fn each(&self) -> [(BoundaryCondition, Side); 2] {
        [(self.lower, Side::Lower), (self.upper, Side::Upper)]
    }

    /// See [`BoundaryCondition::apply_before_applying`].
    pub fn apply_before_applying(&self, op: &mut TridiagonalOperator) {
        for (bc, side) in self.each() {
            bc.apply_before_applying(side, op);
        }
    }

    /// See [`BoundaryCondition::apply_after_applying`].
    pub fn apply_after_applying(&self, u: &mut Array) {
        for (bc, side) in self.each() {
            bc.apply_after_applying(side, u);
        }
    }

    /// See [`BoundaryCondition::apply_before_solving`].
    pub fn apply_before_solving(&self, op: &mut TridiagonalOperator, rhs: &mut Array) {
        for (bc, side) in self.each() {
            bc.apply_before_solving(side, op, rhs);
        }
    }

    /// See [`BoundaryCondition::apply_after_solving`].
    pub fn apply_after_solving(&self, u: &mut Array) {
        for (bc, side) in self.each() {
            bc.apply_after_solving(side, u);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirichlet_pins_the_edges() {
        let bcs = BoundaryConditionSet::new(
            BoundaryCondition::Dirichlet(0.0),
            BoundaryCondition::Dirichlet(7.0),
        );
        let mut u = Array::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        bcs.apply_after_applying(&mut u);
        assert_eq!(u.as_slice(), &[0.0, 2.0, 3.0, 7.0]);
    }

    #[test]
    fn neumann_keeps_edge_slopes_through_a_solve() {
        let values = Array::from_slice(&[0.0, 0.0, 1.0, 3.0]);
        let bcs = BoundaryConditionSet::neumann_from_edges(&values);
        let mut op = TridiagonalOperator::identity(4);
        op.set_mid_rows(-0.1, 1.2, -0.1);
        let mut rhs = values.clone();
        bcs.apply_before_solving(&mut op, &mut rhs);
        let mut u = op.solve_for(&rhs).unwrap();
        bcs.apply_after_solving(&mut u);
        assert!((u[1] - u[0]).abs() < 1e-12);
        assert!((u[3] - u[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn second_derivative_condition_extends_linearly() {
        let bcs = BoundaryConditionSet::new(
            BoundaryCondition::SecondDerivative(0.0),
            BoundaryCondition::SecondDerivative(0.0),
        );
        let mut u = Array::from_slice(&[9.0, 2.0, 4.0, 6.0, -1.0]);
        bcs.apply_after_solving(&mut u);
        assert_eq!(u.as_slice(), &[0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn explicit_rows_are_replaced() {
        let mut op = TridiagonalOperator::new(3);
        BoundaryConditionSet::neumann_from_edges(&Array::zeros(3)).apply_before_applying(&mut op);
        assert_eq!((op.diag[0], op.upper[0]), (-1.0, 1.0));
        assert_eq!((op.lower[2], op.diag[2]), (-1.0, 1.0));
    }
}
