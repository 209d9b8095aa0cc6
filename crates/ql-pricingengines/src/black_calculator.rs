//! Black formula for striked payoffs.
//!
//! The price is written as `discount · (F·α + X·β)`, where the coefficients
//! depend on the payoff kind:
//!
//! | payoff          | α          | X      | β          |
//! |-----------------|------------|--------|------------|
//! | vanilla call    | N(d₁)      | K      | −N(d₂)     |
//! | vanilla put     | −N(−d₁)    | K      | N(−d₂)     |
//! | cash-or-nothing | 0          | cash   | N(±d₂)     |
//! | asset-or-nothing| N(±d₁)     | 0      | 0          |
//!
//! Greeks follow by differentiating α and β through `d₁` and `d₂`.

use ql_core::{errors::Result, DiscountFactor, Real, Time};
use ql_instruments::{OptionType, PayoffKind, StrikedPayoff};
use ql_math::{normal_cdf, normal_pdf};

/// Closed-form Black price and sensitivities of a striked payoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackCalculator {
    option_type: OptionType,
    strike: Real,
    forward: Real,
    std_dev: Real,
    discount: DiscountFactor,
    d1: Real,
    d2: Real,
    cum_d1: Real,
    cum_d2: Real,
    alpha: Real,
    beta: Real,
    d_alpha_d_d1: Real,
    d_beta_d_d2: Real,
    x: Real,
}

impl BlackCalculator {
    /// Set up the formula for `payoff` on a forward `forward` with total
    /// standard deviation `std_dev` and discount factor `discount`.
    ///
    /// # Errors
    /// Non-positive forward or discount, negative standard deviation, or a
    /// negative strike.
    pub fn new(
        payoff: &dyn StrikedPayoff,
        forward: Real,
        std_dev: Real,
        discount: DiscountFactor,
    ) -> Result<Self> {
        let strike = payoff.strike();
        ql_core::ensure!(forward > 0.0, "positive forward value required: {forward} not allowed");
        ql_core::ensure!(std_dev >= 0.0, "non-negative standard deviation required: {std_dev} not allowed");
        ql_core::ensure!(discount > 0.0, "positive discount required: {discount} not allowed");
        ql_core::ensure!(strike >= 0.0, "strike ({strike}) must be non-negative");

        let (d1, d2, cum_d1, cum_d2, n_d1, n_d2) = if std_dev >= Real::EPSILON {
            let d1 = if strike == 0.0 {
                Real::MAX
            } else {
                (forward / strike).ln() / std_dev + 0.5 * std_dev
            };
            let d2 = d1 - std_dev;
            (d1, d2, normal_cdf(d1), normal_cdf(d2), normal_pdf(d1), normal_pdf(d2))
        } else if ql_math::close_enough(forward, strike, 42) {
            (0.0, 0.0, 0.5, 0.5, 0.0, 0.0)
        } else if forward > strike {
            (Real::MAX, Real::MAX, 1.0, 1.0, 0.0, 0.0)
        } else {
            (-Real::MAX, -Real::MAX, 0.0, 0.0, 0.0, 0.0)
        };

        let option_type = payoff.option_type();
        let (mut alpha, mut d_alpha_d_d1, mut beta, mut d_beta_d_d2) = match option_type {
            OptionType::Call => (cum_d1, n_d1, -cum_d2, -n_d2),
            OptionType::Put => (cum_d1 - 1.0, n_d1, 1.0 - cum_d2, -n_d2),
        };
        let mut x = strike;

        match payoff.kind() {
            PayoffKind::Vanilla => {}
            PayoffKind::CashOrNothing { cash } => {
                alpha = 0.0;
                d_alpha_d_d1 = 0.0;
                x = cash;
                match option_type {
                    OptionType::Call => {
                        beta = cum_d2;
                        d_beta_d_d2 = n_d2;
                    }
                    OptionType::Put => {
                        beta = 1.0 - cum_d2;
                        d_beta_d_d2 = -n_d2;
                    }
                }
            }
            PayoffKind::AssetOrNothing => {
                beta = 0.0;
                d_beta_d_d2 = 0.0;
                match option_type {
                    OptionType::Call => {
                        alpha = cum_d1;
                        d_alpha_d_d1 = n_d1;
                    }
                    OptionType::Put => {
                        alpha = 1.0 - cum_d1;
                        d_alpha_d_d1 = -n_d1;
                    }
                }
            }
        }

        Ok(Self {
            option_type,
            strike,
            forward,
            std_dev,
            discount,
            d1,
            d2,
            cum_d1,
            cum_d2,
            alpha,
            beta,
            d_alpha_d_d1,
            d_beta_d_d2,
            x,
        })
    }

    /// Present value.
    pub fn value(&self) -> Real {
        self.discount * (self.forward * self.alpha + self.x * self.beta)
    }

    /// Sensitivities of α and β to the spot, zero for a degenerate
    /// distribution.
    fn d_alpha_beta_d_spot(&self, spot: Real) -> (Real, Real) {
        if self.std_dev < Real::EPSILON {
            return (0.0, 0.0);
        }
        let temp = self.std_dev * spot;
        (self.d_alpha_d_d1 / temp, self.d_beta_d_d2 / temp)
    }

    /// Sensitivity to the spot, the forward being `spot · F/S`.
    ///
    /// # Errors
    /// `spot` must be positive.
    pub fn delta(&self, spot: Real) -> Result<Real> {
        ql_core::ensure!(spot > 0.0, "positive spot value required: {spot} not allowed");
        let d_forward_d_spot = self.forward / spot;
        let (d_alpha, d_beta) = self.d_alpha_beta_d_spot(spot);
        Ok(self.discount
            * (d_alpha * self.forward + self.alpha * d_forward_d_spot + d_beta * self.x))
    }

    /// Sensitivity to the forward.
    pub fn delta_forward(&self) -> Real {
        let (d_alpha, d_beta) = self.d_alpha_beta_d_spot(self.forward);
        self.discount * (d_alpha * self.forward + self.alpha + d_beta * self.x)
    }

    /// Second derivative with respect to the spot.
    ///
    /// # Errors
    /// `spot` must be positive.
    pub fn gamma(&self, spot: Real) -> Result<Real> {
        ql_core::ensure!(spot > 0.0, "positive spot value required: {spot} not allowed");
        if self.std_dev < Real::EPSILON {
            return Ok(0.0);
        }
        let d_forward_d_spot = self.forward / spot;
        let (d_alpha, d_beta) = self.d_alpha_beta_d_spot(spot);
        let d2_alpha = -d_alpha / spot * (1.0 + self.d1 / self.std_dev);
        let d2_beta = -d_beta / spot * (1.0 + self.d2 / self.std_dev);
        Ok(self.discount
            * (d2_alpha * self.forward + 2.0 * d_alpha * d_forward_d_spot + d2_beta * self.x))
    }

    /// Sensitivity to the volatility, for an option expiring at `maturity`.
    ///
    /// # Errors
    /// `maturity` must not be negative.
    pub fn vega(&self, maturity: Time) -> Result<Real> {
        ql_core::ensure!(maturity >= 0.0, "negative maturity not allowed");
        if self.std_dev < Real::EPSILON || maturity == 0.0 {
            return Ok(0.0);
        }
        let temp = (self.strike / self.forward).ln() / (self.std_dev * self.std_dev);
        let d_d1_d_sigma = maturity.sqrt() * (temp + 0.5);
        let d_d2_d_sigma = maturity.sqrt() * (temp - 0.5);
        Ok(self.discount
            * (self.d_alpha_d_d1 * d_d1_d_sigma * self.forward
                + self.d_beta_d_d2 * d_d2_d_sigma * self.x))
    }

    /// Risk-neutral probability of ending in the money, `N(±d₂)`.
    pub fn itm_cash_probability(&self) -> Real {
        match self.option_type {
            OptionType::Call => self.cum_d2,
            OptionType::Put => 1.0 - self.cum_d2,
        }
    }

    /// In-the-money probability under the asset measure, `N(±d₁)`.
    pub fn itm_asset_probability(&self) -> Real {
        match self.option_type {
            OptionType::Call => self.cum_d1,
            OptionType::Put => 1.0 - self.cum_d1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ql_instruments::{AssetOrNothingPayoff, CashOrNothingPayoff, PlainVanillaPayoff};

    fn calculator(payoff: &dyn StrikedPayoff) -> BlackCalculator {
        // S=100, r=5%, q=2%, σ=25%, T=0.75
        let (spot, r, q, sigma, t) = (100.0_f64, 0.05_f64, 0.02_f64, 0.25_f64, 0.75_f64);
        let forward = spot * ((r - q) * t).exp();
        BlackCalculator::new(payoff, forward, sigma * t.sqrt(), (-r * t).exp()).unwrap()
    }

    #[test]
    fn atm_call_reference_value() {
        // S=K=100, r=5%, σ=20%, T=1: 10.4506
        let payoff = PlainVanillaPayoff::new(OptionType::Call, 100.0);
        let forward = 100.0 * 0.05_f64.exp();
        let black = BlackCalculator::new(&payoff, forward, 0.2, (-0.05_f64).exp()).unwrap();
        assert_relative_eq!(black.value(), 10.450_583_572_185_565, max_relative = 1e-9);
        assert_relative_eq!(black.delta(100.0).unwrap(), 0.636_830_651_175_619, max_relative = 1e-9);
    }

    #[test]
    fn put_call_parity() {
        let call = calculator(&PlainVanillaPayoff::new(OptionType::Call, 105.0));
        let put = calculator(&PlainVanillaPayoff::new(OptionType::Put, 105.0));
        let forward_value = call.discount * (call.forward - 105.0);
        assert_relative_eq!(call.value() - put.value(), forward_value, max_relative = 1e-12);
        assert_relative_eq!(call.gamma(100.0).unwrap(), put.gamma(100.0).unwrap(), max_relative = 1e-12);
    }

    #[test]
    fn binaries_add_up_to_the_vanilla() {
        let k = 95.0;
        let vanilla = calculator(&PlainVanillaPayoff::new(OptionType::Call, k));
        let asset = calculator(&AssetOrNothingPayoff::new(OptionType::Call, k));
        let cash = calculator(&CashOrNothingPayoff::new(OptionType::Call, k, k));
        assert_relative_eq!(asset.value() - cash.value(), vanilla.value(), max_relative = 1e-12);
        assert_relative_eq!(
            asset.delta(100.0).unwrap() - cash.delta(100.0).unwrap(),
            vanilla.delta(100.0).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn greeks_match_finite_differences() {
        let payoff = PlainVanillaPayoff::new(OptionType::Put, 110.0);
        let (r, q, sigma, t) = (0.05_f64, 0.02_f64, 0.25_f64, 0.75_f64);
        let price = |spot: Real, vol: Real| {
            let forward = spot * ((r - q) * t).exp();
            BlackCalculator::new(&payoff, forward, vol * t.sqrt(), (-r * t).exp())
                .unwrap()
                .value()
        };
        let black = calculator(&payoff);
        let h = 1e-3;
        let fd_delta = (price(100.0 + h, sigma) - price(100.0 - h, sigma)) / (2.0 * h);
        let fd_gamma =
            (price(100.0 + h, sigma) - 2.0 * price(100.0, sigma) + price(100.0 - h, sigma)) / (h * h);
        let fd_vega = (price(100.0, sigma + 1e-5) - price(100.0, sigma - 1e-5)) / 2e-5;
        assert_relative_eq!(black.delta(100.0).unwrap(), fd_delta, max_relative = 1e-6);
        assert_relative_eq!(black.gamma(100.0).unwrap(), fd_gamma, max_relative = 1e-4);
        assert_relative_eq!(black.vega(t).unwrap(), fd_vega, max_relative = 1e-6);
    }

    #[test]
    fn zero_volatility_is_discounted_intrinsic() {
        let payoff = PlainVanillaPayoff::new(OptionType::Call, 90.0);
        let black = BlackCalculator::new(&payoff, 100.0, 0.0, 0.9).unwrap();
        assert_relative_eq!(black.value(), 9.0, max_relative = 1e-12);
        assert_eq!(black.gamma(100.0).unwrap(), 0.0);
        assert_eq!(black.itm_cash_probability(), 1.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let payoff = PlainVanillaPayoff::new(OptionType::Call, 100.0);
        assert!(BlackCalculator::new(&payoff, -1.0, 0.2, 0.9).is_err());
        assert!(BlackCalculator::new(&payoff, 100.0, -0.2, 0.9).is_err());
        assert!(BlackCalculator::new(&payoff, 100.0, 0.2, 0.0).is_err());
        let black = BlackCalculator::new(&payoff, 100.0, 0.2, 0.9).unwrap();
        assert!(black.delta(0.0).is_err());
    }
}
