//! # ql-methods
//!
//! Finite-difference machinery for pricing options by backward rollback of
//! the Black-Scholes PDE: operators, boundary conditions, the θ-scheme
//! evolver, step conditions and the rollback model.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Finite difference methods: operators, schemes, conditions and rollback.
pub mod finite_differences;

pub use finite_differences::{
    bsm_operator, BoundaryCondition, BoundaryConditionSet, BsmTermOperator, FdOperator,
    FdmScheme, FdmSettings, FiniteDifferenceModel, MixedScheme, Side, StepCondition,
    TridiagonalOperator,
};
