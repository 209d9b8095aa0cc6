//! Backward rollback of one or more value grids.

use super::boundary_condition::BoundaryConditionSet;
use super::bsm_operator::FdOperator;
use super::mixed_scheme::MixedScheme;
use super::settings::FdmScheme;
use super::step_condition::StepCondition;
use ql_core::{errors::Result, Real, Size, Time};
use ql_math::Array;

/// Landing times closer than this to a stopping time or to the end of the
/// rollback are moved onto it.
const SNAP_TOLERANCE: Time = 1.490_116_119_384_765_6e-8;

/// A finite-difference model: operators, boundary conditions and stopping
/// times for a set of grids that are rolled back in lockstep.
///
/// The model is immutable; each rollback builds its own evolvers, so one
/// model may be shared between threads.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceModel {
    operators: Vec<FdOperator>,
    bcs: Vec<BoundaryConditionSet>,
    stopping_times: Vec<Time>,
    theta: Real,
}

impl FiniteDifferenceModel {
    /// Model for a single grid.
    ///
    /// # Errors
    /// See [`coupled`](Self::coupled).
    pub fn new(
        operator: FdOperator,
        bcs: BoundaryConditionSet,
        stopping_times: Vec<Time>,
        scheme: FdmScheme,
    ) -> Result<Self> {
        Self::coupled(vec![operator], vec![bcs], stopping_times, scheme)
    }

    /// Model for several grids sharing one time axis.
    ///
    /// Stopping times are sorted and deduplicated.
    ///
    /// # Errors
    /// [`ql_core::Error::Precondition`] for no operators, differing operator
    /// and boundary counts, or a non-finite stopping time.
    pub fn coupled(
        operators: Vec<FdOperator>,
        bcs: Vec<BoundaryConditionSet>,
        mut stopping_times: Vec<Time>,
        scheme: FdmScheme,
    ) -> Result<Self> {
        ql_core::ensure!(!operators.is_empty(), "at least one operator is required");
        ql_core::ensure!(
            operators.len() == bcs.len(),
            "{} operators given with {} boundary condition sets",
            operators.len(),
            bcs.len()
        );
        ql_core::ensure!(
            stopping_times.iter().all(|t| t.is_finite()),
            "stopping times must be finite"
        );
        stopping_times.sort_by(|a, b| a.total_cmp(b));
        stopping_times.dedup();
        Ok(Self {
            operators,
            bcs,
            stopping_times,
            theta: scheme.theta(),
        })
    }

    /// Sorted, distinct stopping times.
    pub fn stopping_times(&self) -> &[Time] {
        &self.stopping_times
    }

    /// Number of grids the model evolves.
    pub fn grids(&self) -> usize {
        self.operators.len()
    }

    /// Roll a single grid back from `from` to `to` in `steps` steps.
    ///
    /// # Errors
    /// See [`rollback_coupled`](Self::rollback_coupled).
    pub fn rollback(
        &self,
        a: &mut Array,
        from: Time,
        to: Time,
        steps: Size,
        condition: &StepCondition,
    ) -> Result<()> {
        self.rollback_coupled(
            std::slice::from_mut(a),
            from,
            to,
            steps,
            std::slice::from_ref(condition),
        )
    }

    /// Roll every grid back from `from` to `to` in `steps` uniform steps.
    ///
    /// Steps are split at stopping times strictly inside them. Each
    /// grid's condition runs after every landing, and once at `from` if
    /// `from` is itself a stopping time. No grid advances ahead of another.
    ///
    /// # Errors
    /// [`ql_core::Error::Precondition`] for zero steps, `from < to` or
    /// differing grid, operator and condition counts;
    /// [`ql_core::Error::SizeMismatch`] when a grid and its operator differ
    /// in size; and any error from the evolvers or the conditions.
    pub fn rollback_coupled(
        &self,
        arrays: &mut [Array],
        from: Time,
        to: Time,
        steps: Size,
        conditions: &[StepCondition],
    ) -> Result<()> {
        ql_core::ensure!(steps > 0, "the number of steps must be positive");
        ql_core::ensure!(from >= to, "rollback runs backward: from {from} < to {to}");
        ql_core::ensure!(
            arrays.len() == self.operators.len() && conditions.len() == arrays.len(),
            "{} grids given to a model of {} operators with {} step conditions",
            arrays.len(),
            self.operators.len(),
            conditions.len()
        );
        for (a, op) in arrays.iter().zip(&self.operators) {
            ql_core::ensure_same_size!(a.size(), op.size(), "grid and operator");
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            from,
            to,
            steps,
            grids = arrays.len(),
            stopping_times = self.stopping_times.len(),
            "rollback started"
        );

        let dt = (from - to) / steps as Real;
        let mut evolvers: Vec<MixedScheme<'_>> = self
            .operators
            .iter()
            .zip(&self.bcs)
            .map(|(op, bcs)| MixedScheme::new(op, *bcs, self.theta))
            .collect();

        let mut lockstep = Lockstep {
            arrays,
            evolvers: &mut evolvers,
            conditions,
        };

        if self.stopping_times.last() == Some(&from) {
            lockstep.apply_conditions(from)?;
        }

        let mut now = from;
        for i in 1..=steps {
            let mut next = from - i as Real * dt;
            if (next - to).abs() < SNAP_TOLERANCE || i == steps {
                next = to;
            }
            if let Some(&s) = self
                .stopping_times
                .iter()
                .find(|&&s| (s - next).abs() < SNAP_TOLERANCE)
            {
                next = s;
            }

            for &s in self.stopping_times.iter().rev() {
                if next <= s && s < now {
                    lockstep.evolve(now, now - s)?;
                    lockstep.apply_conditions(s)?;
                    #[cfg(feature = "logging")]
                    tracing::trace!(time = s, "landed on stopping time");
                    now = s;
                }
            }
            if now > next {
                lockstep.evolve(now, now - next)?;
                lockstep.apply_conditions(next)?;
                now = next;
            }
        }
        Ok(())
    }
}

/// Grids, evolvers and conditions advanced together.
struct Lockstep<'m, 'a> {
    arrays: &'a mut [Array],
    evolvers: &'a mut [MixedScheme<'m>],
    conditions: &'a [StepCondition],
}

impl Lockstep<'_, '_> {
    fn evolve(&mut self, from: Time, dt: Time) -> Result<()> {
        for (a, evolver) in self.arrays.iter_mut().zip(self.evolvers.iter_mut()) {
            evolver.set_step(dt);
            evolver.step(a, from)?;
        }
        Ok(())
    }

    fn apply_conditions(&mut self, t: Time) -> Result<()> {
        for (a, condition) in self.arrays.iter_mut().zip(self.conditions) {
            condition.apply_to(a, t)?;
        }
        Ok(())
    }
}
