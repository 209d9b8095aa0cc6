//! Finite-difference rollback of option values on a log-price grid.
//!
//! * [`TridiagonalOperator`]: banded operator with a Thomas-algorithm solver
//! * [`bsm_operator`] / [`BsmTermOperator`]: the Black-Scholes-Merton operator
//! * [`BoundaryConditionSet`]: Dirichlet, Neumann or second-derivative edges
//! * [`MixedScheme`]: θ-scheme evolver
//! * [`StepCondition`]: exercise, shout and dividend events
//! * [`FiniteDifferenceModel`]: lockstep rollback with stopping times

pub mod boundary_condition;
pub mod bsm_operator;
pub mod mixed_scheme;
pub mod model;
pub mod settings;
pub mod step_condition;
pub mod tridiagonal_operator;

pub use boundary_condition::{BoundaryCondition, BoundaryConditionSet, Side};
pub use bsm_operator::{bsm_operator, BsmTermOperator, FdOperator};
pub use mixed_scheme::MixedScheme;
pub use model::FiniteDifferenceModel;
pub use settings::{FdmScheme, FdmSettings};
pub use step_condition::StepCondition;
pub use tridiagonal_operator::TridiagonalOperator;
