//! Vanilla option instruments, with and without discrete dividends.

use crate::exercise::Exercise;
use crate::instrument::{Instrument, PricingEngine};
use crate::payoff::{OptionType, Payoff, PlainVanillaPayoff};
use ql_cashflows::DividendSchedule;
use ql_core::{errors::Result, Real, Time};
use ql_math::SampledCurve;
use std::sync::Arc;

// ────────────────────────────────────────────────────────────────────────────
// Arguments and results
// ────────────────────────────────────────────────────────────────────────────

/// Arguments needed for pricing a one-asset option.
#[derive(Debug, Clone)]
pub struct VanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn Payoff>,
    /// The exercise specification.
    pub exercise: Exercise,
    /// Discrete dividends paid by the underlying before expiry.
    pub dividends: DividendSchedule,
}

/// Results of a finite-difference pricing call.
///
/// Built once, complete, at the end of the call.
#[derive(Debug, Clone)]
pub struct OneAssetOptionResults {
    /// Option value.
    pub value: Real,
    /// First derivative of the value with respect to the spot.
    pub delta: Real,
    /// Second derivative of the value with respect to the spot.
    pub gamma: Real,
    /// Value of the option across the price grid at valuation.
    pub price_curve: SampledCurve,
}

// ────────────────────────────────────────────────────────────────────────────
// VanillaOption
// ────────────────────────────────────────────────────────────────────────────

/// An option on a single underlying asset.
#[derive(Debug, Clone)]
pub struct VanillaOption {
    payoff: Arc<dyn Payoff>,
    exercise: Exercise,
}

impl VanillaOption {
    /// Create a new vanilla option.
    pub fn new(payoff: Arc<dyn Payoff>, exercise: Exercise) -> Self {
        Self { payoff, exercise }
    }

    /// Convenience: create a European call/put.
    pub fn european(option_type: OptionType, strike: Real, expiry: Time) -> Self {
        Self::new(
            Arc::new(PlainVanillaPayoff::new(option_type, strike)),
            Exercise::european(expiry),
        )
    }

    /// Convenience: create an American call/put exercisable from now on.
    ///
    /// # Errors
    /// `expiry` must not be negative.
    pub fn american(option_type: OptionType, strike: Real, expiry: Time) -> Result<Self> {
        Ok(Self::new(
            Arc::new(PlainVanillaPayoff::new(option_type, strike)),
            Exercise::american(0.0, expiry)?,
        ))
    }

    /// The strike price, if the payoff has one.
    pub fn strike(&self) -> Option<Real> {
        self.payoff.as_striked().map(|p| p.strike())
    }

    /// The payoff.
    pub fn payoff(&self) -> &dyn Payoff {
        &*self.payoff
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// Get the arguments for a pricing engine.
    pub fn arguments(&self) -> VanillaOptionArguments {
        VanillaOptionArguments {
            payoff: Arc::clone(&self.payoff),
            exercise: self.exercise.clone(),
            dividends: DividendSchedule::default(),
        }
    }

    /// Price this option using the given engine.
    pub fn price<E>(&self, engine: &E) -> Result<E::Results>
    where
        E: PricingEngine<VanillaOptionArguments> + ?Sized,
    {
        engine.calculate(&self.arguments())
    }
}

impl Instrument for VanillaOption {
    fn maturity_time(&self) -> Time {
        self.exercise.last_time()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DividendVanillaOption
// ────────────────────────────────────────────────────────────────────────────

/// A vanilla option whose underlying pays discrete dividends.
#[derive(Debug, Clone)]
pub struct DividendVanillaOption {
    option: VanillaOption,
    dividends: DividendSchedule,
}

impl DividendVanillaOption {
    /// Create an option on an underlying paying `dividends`.
    pub fn new(payoff: Arc<dyn Payoff>, exercise: Exercise, dividends: DividendSchedule) -> Self {
        Self {
            option: VanillaOption::new(payoff, exercise),
            dividends,
        }
    }

    /// Create an option on an underlying paying cash dividends.
    ///
    /// # Errors
    /// Fails with a size mismatch if `dividend_times` and
    /// `dividend_amounts` differ in length.
    pub fn with_cash_dividends(
        payoff: Arc<dyn Payoff>,
        exercise: Exercise,
        dividend_times: &[Time],
        dividend_amounts: &[Real],
    ) -> Result<Self> {
        let dividends = DividendSchedule::from_cash(dividend_times, dividend_amounts)?;
        Ok(Self::new(payoff, exercise, dividends))
    }

    /// The dividend schedule.
    pub fn dividends(&self) -> &DividendSchedule {
        &self.dividends
    }

    /// The payoff.
    pub fn payoff(&self) -> &dyn Payoff {
        self.option.payoff()
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        self.option.exercise()
    }

    /// Get the arguments for a pricing engine.
    pub fn arguments(&self) -> VanillaOptionArguments {
        VanillaOptionArguments {
            dividends: self.dividends.clone(),
            ..self.option.arguments()
        }
    }

    /// Price this option using the given engine.
    pub fn price<E>(&self, engine: &E) -> Result<E::Results>
    where
        E: PricingEngine<VanillaOptionArguments> + ?Sized,
    {
        engine.calculate(&self.arguments())
    }
}

impl Instrument for DividendVanillaOption {
    fn maturity_time(&self) -> Time {
        self.option.maturity_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseType;
    use crate::payoff::{ForwardPayoff, Position};

    #[test]
    fn european_call_construction() {
        let opt = VanillaOption::european(OptionType::Call, 100.0, 1.5);
        assert_eq!(opt.strike(), Some(100.0));
        assert_eq!(opt.exercise().exercise_type(), ExerciseType::European);
        assert_eq!(opt.maturity_time(), 1.5);
        assert!(!opt.is_expired());
    }

    #[test]
    fn forward_payoff_has_no_strike() {
        let opt = VanillaOption::new(
            Arc::new(ForwardPayoff::new(Position::Long, 100.0)),
            Exercise::european(1.0),
        );
        assert_eq!(opt.strike(), None);
    }

    #[test]
    fn dividend_option_arguments_carry_the_schedule() {
        let opt = DividendVanillaOption::with_cash_dividends(
            Arc::new(PlainVanillaPayoff::new(OptionType::Put, 90.0)),
            Exercise::american(0.0, 1.0).unwrap(),
            &[0.75, 0.25],
            &[1.0, 2.0],
        )
        .unwrap();
        let args = opt.arguments();
        assert_eq!(args.dividends.times(), vec![0.25, 0.75]);
        assert_eq!(args.exercise.exercise_type(), ExerciseType::American);
        assert_eq!(opt.maturity_time(), 1.0);
    }

    #[test]
    fn mismatched_dividends_are_rejected() {
        let res = DividendVanillaOption::with_cash_dividends(
            Arc::new(PlainVanillaPayoff::new(OptionType::Put, 90.0)),
            Exercise::european(1.0),
            &[0.25, 0.5, 0.75],
            &[1.0, 2.0],
        );
        assert!(matches!(res, Err(ql_core::Error::SizeMismatch { .. })));
    }
}
