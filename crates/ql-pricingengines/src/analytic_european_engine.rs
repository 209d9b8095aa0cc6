//! Analytic European option engine (Black-Scholes-Merton).
//!
//! Prices European options with the closed-form Black formula on the
//! forward `S·D_q(T)/D_r(T)` and the total volatility `√(σ²T)` read from
//! the process's term structures.

use crate::black_calculator::BlackCalculator;
use ql_core::{errors::Result, Error, Real, Time};
use ql_instruments::{
    ExerciseType, OptionType, PlainVanillaPayoff, PricingEngine, PricingResults, StrikedPayoff,
    VanillaOptionArguments,
};
use ql_processes::GeneralizedBlackScholesProcess;
use ql_termstructures::{BlackVolTermStructure, YieldTermStructure};

use std::sync::Arc;

/// Analytic pricing engine for European options on striked payoffs.
///
/// Reports the NPV plus `delta`, `gamma`, `vega`, `delta_forward` and the
/// cash and asset in-the-money probabilities as additional results.
#[derive(Debug, Clone)]
pub struct AnalyticEuropeanEngine {
    process: Arc<GeneralizedBlackScholesProcess>,
}

impl AnalyticEuropeanEngine {
    /// Create a new engine with the given Black-Scholes process.
    pub fn new(process: Arc<GeneralizedBlackScholesProcess>) -> Self {
        Self { process }
    }

    /// The Black calculator for `payoff` expiring at `maturity`.
    ///
    /// # Errors
    /// Invalid market data (non-positive forward or discount).
    pub fn black_calculator(&self, payoff: &dyn StrikedPayoff, maturity: Time) -> Result<BlackCalculator> {
        let process = &self.process;
        let variance = process.black_volatility().black_variance(maturity, payoff.strike());
        let dividend_discount = process.dividend_yield().discount(maturity);
        let risk_free_discount = process.risk_free_rate().discount(maturity);
        let forward = process.spot() * dividend_discount / risk_free_discount;
        BlackCalculator::new(payoff, forward, variance.sqrt(), risk_free_discount)
    }
}

impl PricingEngine<VanillaOptionArguments> for AnalyticEuropeanEngine {
    type Results = PricingResults;

    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        ql_core::ensure!(
            args.exercise.exercise_type() == ExerciseType::European,
            "not an European option"
        );
        ql_core::ensure!(args.dividends.is_empty(), "discrete dividends are not supported");
        let payoff = args
            .payoff
            .as_striked()
            .ok_or_else(|| Error::Configuration("non-striked payoff given".into()))?;
        let maturity = args.exercise.last_time();
        let spot = self.process.spot();
        let black = self.black_calculator(payoff, maturity)?;

        Ok(PricingResults::from_npv(black.value())
            .with_result("delta", black.delta(spot)?)
            .with_result("gamma", black.gamma(spot)?)
            .with_result("vega", black.vega(maturity)?)
            .with_result("delta_forward", black.delta_forward())
            .with_result("itm_cash_probability", black.itm_cash_probability())
            .with_result("itm_asset_probability", black.itm_asset_probability()))
    }
}

/// Black-Scholes-Merton price, delta, gamma and vega of a plain vanilla
/// option with flat rates and volatility.
///
/// # Errors
/// Non-positive spot or negative volatility or time.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    dividend_yield: Real,
    volatility: Real,
    time_to_expiry: Time,
) -> Result<(Real, Real, Real, Real)> {
    ql_core::ensure!(time_to_expiry >= 0.0, "negative time to expiry");
    let t = time_to_expiry;
    let payoff = PlainVanillaPayoff::new(option_type, strike);
    let forward = spot * ((risk_free_rate - dividend_yield) * t).exp();
    let black = BlackCalculator::new(&payoff, forward, volatility * t.sqrt(), (-risk_free_rate * t).exp())?;
    Ok((black.value(), black.delta(spot)?, black.gamma(spot)?, black.vega(t)?))
}
