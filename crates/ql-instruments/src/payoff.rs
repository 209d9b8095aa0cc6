//! Option payoff hierarchy.
//!
//! Payoffs describe the terminal (or exercise) payoff of an option as a
//! function of the underlying asset price. Striked payoffs additionally
//! expose their strike, option type and the closed-form family they belong
//! to, which is what a Black-formula comparable needs.

use ql_core::Real;
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// Closed-form family of a striked payoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayoffKind {
    /// `max(φ(S − K), 0)`.
    Vanilla,
    /// A fixed cash amount when in the money.
    CashOrNothing {
        /// Amount paid.
        cash: Real,
    },
    /// The asset itself when in the money.
    AssetOrNothing,
}

/// Base trait for option payoffs.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Compute the payoff given the underlying price at exercise/expiry.
    fn value(&self, price: Real) -> Real;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> String {
        self.name().to_string()
    }

    /// View this payoff as a striked payoff, if it is one.
    fn as_striked(&self) -> Option<&dyn StrikedPayoff> {
        None
    }
}

/// A payoff depending on a strike price.
pub trait StrikedPayoff: Payoff {
    /// The strike price.
    fn strike(&self) -> Real;

    /// The option type (call / put).
    fn option_type(&self) -> OptionType;

    /// Closed-form family of the payoff.
    fn kind(&self) -> PayoffKind;
}

/// Standard "plain vanilla" European/American option payoff.
///
/// `payoff = max(φ(S − K), 0)` where `φ = +1` for Call, `−1` for Put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainVanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }
}

impl Payoff for PlainVanillaPayoff {
    fn value(&self, price: Real) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }

    fn name(&self) -> &str {
        "Vanilla"
    }

    fn description(&self) -> String {
        format!("{} {} @ {}", self.name(), self.option_type, self.strike)
    }

    fn as_striked(&self) -> Option<&dyn StrikedPayoff> {
        Some(self)
    }
}

impl StrikedPayoff for PlainVanillaPayoff {
    fn strike(&self) -> Real {
        self.strike
    }

    fn option_type(&self) -> OptionType {
        self.option_type
    }

    fn kind(&self) -> PayoffKind {
        PayoffKind::Vanilla
    }
}

/// Cash-or-nothing payoff: pays a fixed amount if in the money.
///
/// `payoff = cashPayoff` if `φ(S − K) > 0`, else 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashOrNothingPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
    /// Fixed cash payoff.
    pub cash_payoff: Real,
}

impl CashOrNothingPayoff {
    /// Create a new cash-or-nothing payoff.
    pub fn new(option_type: OptionType, strike: Real, cash_payoff: Real) -> Self {
        Self {
            option_type,
            strike,
            cash_payoff,
        }
    }
}

impl Payoff for CashOrNothingPayoff {
    fn value(&self, price: Real) -> Real {
        if self.option_type.sign() * (price - self.strike) > 0.0 {
            self.cash_payoff
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "CashOrNothing"
    }

    fn as_striked(&self) -> Option<&dyn StrikedPayoff> {
        Some(self)
    }
}

impl StrikedPayoff for CashOrNothingPayoff {
    fn strike(&self) -> Real {
        self.strike
    }

    fn option_type(&self) -> OptionType {
        self.option_type
    }

    fn kind(&self) -> PayoffKind {
        PayoffKind::CashOrNothing {
            cash: self.cash_payoff,
        }
    }
}

/// Asset-or-nothing payoff: pays the underlying price if in the money.
///
/// `payoff = S` if `φ(S − K) > 0`, else 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetOrNothingPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
}

impl AssetOrNothingPayoff {
    /// Create a new asset-or-nothing payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }
}

impl Payoff for AssetOrNothingPayoff {
    fn value(&self, price: Real) -> Real {
        if self.option_type.sign() * (price - self.strike) > 0.0 {
            price
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "AssetOrNothing"
    }

    fn as_striked(&self) -> Option<&dyn StrikedPayoff> {
        Some(self)
    }
}

impl StrikedPayoff for AssetOrNothingPayoff {
    fn strike(&self) -> Real {
        self.strike
    }

    fn option_type(&self) -> OptionType {
        self.option_type
    }

    fn kind(&self) -> PayoffKind {
        PayoffKind::AssetOrNothing
    }
}

/// Side of a forward contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Long the underlying.
    Long,
    /// Short the underlying.
    Short,
}

/// Forward payoff `±(S − K)`.
///
/// Unbounded on both sides and not an option payoff, so it has no
/// striked view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardPayoff {
    /// Long or short.
    pub position: Position,
    /// Delivery price.
    pub strike: Real,
}

impl ForwardPayoff {
    /// Create a new forward payoff.
    pub fn new(position: Position, strike: Real) -> Self {
        Self { position, strike }
    }
}

impl Payoff for ForwardPayoff {
    fn value(&self, price: Real) -> Real {
        match self.position {
            Position::Long => price - self.strike,
            Position::Short => self.strike - price,
        }
    }

    fn name(&self) -> &str {
        "Forward"
    }
}
