//! Accuracy knobs for finite-difference pricing.

use ql_core::{errors::Result, Real};
use serde::{Deserialize, Serialize};

/// Time-stepping scheme, i.e. the θ of the mixed scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdmScheme {
    /// θ = 0: conditionally stable, first order in time.
    Explicit,
    /// θ = 1: unconditionally stable, first order in time.
    Implicit,
    /// θ = ½: second order in time.
    #[default]
    CrankNicolson,
}

impl FdmScheme {
    /// Weight of the implicit part.
    pub fn theta(self) -> Real {
        match self {
            Self::Explicit => 0.0,
            Self::Implicit => 1.0,
            Self::CrankNicolson => 0.5,
        }
    }
}

/// Grid and time-step configuration for one pricing call.
///
/// ```
/// use ql_methods::{FdmScheme, FdmSettings};
///
/// let settings = FdmSettings::default()
///     .with_time_steps(200)
///     .with_grid_points(201)
///     .with_scheme(FdmScheme::Implicit);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FdmSettings {
    /// Number of backward time steps.
    pub time_steps: usize,
    /// Minimum number of price levels.
    pub grid_points: usize,
    /// Time-stepping scheme.
    pub scheme: FdmScheme,
    /// Rebuild the operator from the term structures at every step.
    pub time_dependent: bool,
}

impl Default for FdmSettings {
    fn default() -> Self {
        Self {
            time_steps: 100,
            grid_points: 100,
            scheme: FdmScheme::CrankNicolson,
            time_dependent: false,
        }
    }
}

impl FdmSettings {
    /// Set the number of time steps.
    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Set the minimum number of grid points.
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    /// Set the time-stepping scheme.
    pub fn with_scheme(mut self, scheme: FdmScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Toggle the time-dependent operator.
    pub fn with_time_dependent(mut self, time_dependent: bool) -> Self {
        self.time_dependent = time_dependent;
        self
    }

    /// Reject zero counts.
    ///
    /// # Errors
    /// [`ql_core::Error::Precondition`] if either count is zero.
    pub fn validate(&self) -> Result<()> {
        ql_core::ensure!(self.time_steps > 0, "time steps must be positive");
        ql_core::ensure!(self.grid_points > 0, "grid points must be positive");
        Ok(())
    }
}
