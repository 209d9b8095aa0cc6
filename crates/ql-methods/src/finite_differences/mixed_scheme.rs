//! θ-scheme time evolver.
//!
//! One backward step of size `dt` from `t` solves
//! `(I + θ·dt·L)·u(t − dt) = (I − (1 − θ)·dt·L)·u(t)`. θ = 0 is the
//! explicit Euler scheme, θ = 1 the implicit one and θ = ½ Crank–Nicolson.

use super::boundary_condition::BoundaryConditionSet;
use super::bsm_operator::FdOperator;
use super::tridiagonal_operator::TridiagonalOperator;
use ql_core::{errors::Result, Real, Time};
use ql_math::Array;

/// Evolver bound to one operator and one pair of boundary conditions.
///
/// The two parts are cached for constant operators and rebuilt only when
/// the step size changes.
#[derive(Debug, Clone)]
pub struct MixedScheme<'a> {
    operator: &'a FdOperator,
    bcs: BoundaryConditionSet,
    theta: Real,
    dt: Time,
    parts: Option<(TridiagonalOperator, TridiagonalOperator)>,
}

impl<'a> MixedScheme<'a> {
    /// Create an evolver; call [`set_step`](Self::set_step) before stepping.
    pub fn new(operator: &'a FdOperator, bcs: BoundaryConditionSet, theta: Real) -> Self {
        Self {
            operator,
            bcs,
            theta,
            dt: 0.0,
            parts: None,
        }
    }

    /// Current step size.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Change the step size.
    pub fn set_step(&mut self, dt: Time) {
        if dt != self.dt {
            self.dt = dt;
            self.parts = None;
        }
    }

    fn build_parts(&self, t: Time) -> (TridiagonalOperator, TridiagonalOperator) {
        let explicit = self.operator.at(t).identity_plus(-(1.0 - self.theta) * self.dt);
        let implicit = self.operator.at(t - self.dt).identity_plus(self.theta * self.dt);
        (explicit, implicit)
    }

    /// Evolve `a` from `t` to `t − dt` in place.
    ///
    /// # Errors
    /// Size mismatches, or a singular implicit system.
    pub fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        if self.parts.is_none() || self.operator.is_time_dependent() {
            self.parts = Some(self.build_parts(t));
        }
        let bcs = self.bcs;
        let theta = self.theta;
        let Some((explicit, implicit)) = self.parts.as_mut() else {
            ql_core::fail!("θ-scheme parts were not built");
        };

        if theta != 1.0 {
            bcs.apply_before_applying(explicit);
            *a = explicit.apply_to(a)?;
            bcs.apply_after_applying(a);
        }
        if theta != 0.0 {
            bcs.apply_before_solving(implicit, a);
            *a = implicit.solve_for(a)?;
            bcs.apply_after_solving(a);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::boundary_condition::BoundaryCondition;
    use crate::finite_differences::bsm_operator::bsm_operator;

    fn dirichlet_zero() -> BoundaryConditionSet {
        BoundaryConditionSet::new(
            BoundaryCondition::Dirichlet(0.0),
            BoundaryCondition::Dirichlet(0.0),
        )
    }

    #[test]
    fn pure_discounting_in_every_scheme() {
        // σ = 0, ν = 0 except for r: L = r·I in the interior
        let op: FdOperator = bsm_operator(11, 0.1, 0.05, 0.05, 0.0).unwrap().into();
        let bcs = BoundaryConditionSet::neumann_from_edges(&Array::from_element(11, 1.0));
        let dt = 0.01;
        for (theta, expected) in [
            (0.0, 1.0 - 0.05 * dt),
            (1.0, 1.0 / (1.0 + 0.05 * dt)),
            (0.5, (1.0 - 0.025 * dt) / (1.0 + 0.025 * dt)),
        ] {
            let mut scheme = MixedScheme::new(&op, bcs, theta);
            scheme.set_step(dt);
            let mut a = Array::from_element(11, 1.0);
            scheme.step(&mut a, 1.0).unwrap();
            for v in a.iter() {
                assert!((v - expected).abs() < 1e-14, "θ={theta}: {v} vs {expected}");
            }
        }
    }

    #[test]
    fn dirichlet_edges_hold_after_a_step() {
        let op: FdOperator = bsm_operator(21, 0.05, 0.03, 0.0, 0.3).unwrap().into();
        let mut scheme = MixedScheme::new(&op, dirichlet_zero(), 0.5);
        scheme.set_step(0.01);
        let mut a = Array::from_fn(21, |i| (i * (20 - i)) as Real);
        scheme.step(&mut a, 0.5).unwrap();
        assert_eq!(a.front(), 0.0);
        assert_eq!(a.back(), 0.0);
        assert!(a[10] > 0.0);
    }

    #[test]
    fn changing_the_step_rebuilds_the_parts() {
        let op: FdOperator = bsm_operator(11, 0.1, 0.05, 0.05, 0.0).unwrap().into();
        let bcs = BoundaryConditionSet::neumann_from_edges(&Array::from_element(11, 1.0));
        let mut scheme = MixedScheme::new(&op, bcs, 1.0);
        scheme.set_step(0.1);
        let mut a = Array::from_element(11, 1.0);
        scheme.step(&mut a, 1.0).unwrap();
        scheme.set_step(0.2);
        scheme.step(&mut a, 0.9).unwrap();
        let expected = 1.0 / ((1.0 + 0.005) * (1.0 + 0.01));
        assert!((a[5] - expected).abs() < 1e-14);
    }
}
