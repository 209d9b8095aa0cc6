//! Finite-difference engine for options with step conditions.
//!
//! The option grid is rolled back together with a European control grid
//! sharing its operator and boundary conditions. The control's numerical
//! error is then replaced by its Black value:
//!
//! ```text
//! value = numeric(option) − numeric(control) + black(control)
//! ```
//!
//! and likewise for delta and gamma.

use crate::analytic_european_engine::AnalyticEuropeanEngine;
use crate::fd_vanilla_engine::FdVanillaGrid;
use ql_core::{errors::Result, Error, Real, Time};
use ql_instruments::{ExerciseType, OneAssetOptionResults, PricingEngine, VanillaOptionArguments};
use ql_math::{Array, SampledCurve};
use ql_methods::{FdmSettings, FiniteDifferenceModel, StepCondition};
use ql_processes::GeneralizedBlackScholesProcess;
use ql_termstructures::YieldTermStructure;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which early-exercise right the engine prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseRight {
    /// Follow the option's exercise: none for European, every step for
    /// American, on schedule for Bermudan.
    #[default]
    FromExercise,
    /// A shout right: the holder may lock in the intrinsic value at any
    /// time, paid at expiry.
    Shout,
}

/// Control-variate finite-difference engine for vanilla options with
/// early exercise, shout rights and discrete dividends.
#[derive(Debug, Clone)]
pub struct FdStepConditionEngine {
    process: Arc<GeneralizedBlackScholesProcess>,
    settings: FdmSettings,
    right: ExerciseRight,
}

impl FdStepConditionEngine {
    /// Engine following the option's exercise.
    pub fn new(process: Arc<GeneralizedBlackScholesProcess>, settings: FdmSettings) -> Self {
        Self {
            process,
            settings,
            right: ExerciseRight::FromExercise,
        }
    }

    /// Engine pricing a shout right instead of the option's exercise.
    pub fn shout(process: Arc<GeneralizedBlackScholesProcess>, settings: FdmSettings) -> Self {
        Self {
            right: ExerciseRight::Shout,
            ..Self::new(process, settings)
        }
    }

    /// The accuracy settings.
    pub fn settings(&self) -> &FdmSettings {
        &self.settings
    }

    /// The exercise right priced.
    pub fn right(&self) -> ExerciseRight {
        self.right
    }

    fn exercise_condition(
        &self,
        args: &VanillaOptionArguments,
        intrinsic: &Array,
        residual_time: Time,
    ) -> Option<StepCondition> {
        match self.right {
            ExerciseRight::Shout => {
                let rate = self.process.risk_free_rate().zero_rate(residual_time);
                Some(StepCondition::shout(intrinsic.clone(), residual_time, rate))
            }
            ExerciseRight::FromExercise => match args.exercise.exercise_type() {
                ExerciseType::European => None,
                ExerciseType::American => Some(StepCondition::american(intrinsic.clone())),
                ExerciseType::Bermudan => Some(StepCondition::bermudan(
                    intrinsic.clone(),
                    args.exercise.times().to_vec(),
                )),
            },
        }
    }

    fn step_condition(
        &self,
        args: &VanillaOptionArguments,
        grid: &FdVanillaGrid,
    ) -> StepCondition {
        let residual_time = grid.residual_time;
        let dividends: Vec<_> = args
            .dividends
            .iter()
            .filter(|d| d.time() > 0.0 && d.time() < residual_time)
            .copied()
            .collect();
        let exercise = self.exercise_condition(args, grid.intrinsic.values(), residual_time);

        let mut conditions = Vec::with_capacity(2);
        if !dividends.is_empty() {
            conditions.push(StepCondition::dividends(grid.grid().clone(), dividends));
        }
        conditions.extend(exercise);
        match conditions.len() {
            0 => StepCondition::Null,
            1 => conditions.remove(0),
            _ => StepCondition::Composite(conditions),
        }
    }
}

impl PricingEngine<VanillaOptionArguments> for FdStepConditionEngine {
    type Results = OneAssetOptionResults;

    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OneAssetOptionResults> {
        let striked = args
            .payoff
            .as_striked()
            .ok_or_else(|| Error::Configuration("non-striked payoff given".into()))?;
        let residual_time = args.exercise.last_time();
        let grid = FdVanillaGrid::new(&self.process, &*args.payoff, residual_time, &self.settings)?;

        let condition = self.step_condition(args, &grid);
        let stopping_times: Vec<Time> = condition
            .stopping_times()
            .into_iter()
            .filter(|&t| t >= 0.0 && t <= residual_time)
            .collect();

        #[cfg(feature = "logging")]
        tracing::debug!(
            right = ?self.right,
            exercise = ?args.exercise.exercise_type(),
            dividends = args.dividends.len(),
            stopping_times = stopping_times.len(),
            time_steps = self.settings.time_steps,
            "pricing with step conditions"
        );

        let model = FiniteDifferenceModel::coupled(
            vec![grid.operator.clone(), grid.operator.clone()],
            vec![grid.bcs, grid.bcs],
            stopping_times,
            self.settings.scheme,
        )?;
        let mut arrays = [grid.intrinsic.values().clone(), grid.intrinsic.values().clone()];
        let conditions = [condition, StepCondition::Null];
        model.rollback_coupled(
            &mut arrays,
            residual_time,
            0.0,
            self.settings.time_steps,
            &conditions,
        )?;

        let [prices, control] = arrays;
        let prices = SampledCurve::from_parts(grid.grid().clone(), prices)?;
        let control = SampledCurve::from_parts(grid.grid().clone(), control)?;

        let spot = self.process.spot();
        let black = AnalyticEuropeanEngine::new(Arc::clone(&self.process))
            .black_calculator(striked, residual_time)?;

        let numeric = prices.value_at_center();
        let numeric_control = control.value_at_center();
        let analytic = black.value();

        #[cfg(feature = "logging")]
        tracing::debug!(numeric, numeric_control, analytic, "control variate applied");

        let value: Real = numeric - numeric_control + analytic;
        let delta = prices.first_derivative_at_center()? - control.first_derivative_at_center()?
            + black.delta(spot)?;
        let gamma = prices.second_derivative_at_center()? - control.second_derivative_at_center()?
            + black.gamma(spot)?;

        Ok(OneAssetOptionResults {
            value,
            delta,
            gamma,
            price_curve: prices,
        })
    }
}
