//! `Instrument` and `PricingEngine` traits.
//!
//! Instruments are plain value records. A pricing engine receives the
//! instrument's arguments and returns a freshly built results record; no
//! engine keeps mutable state between calls.

use ql_core::{errors::Result, Real, Time};
use std::collections::HashMap;

/// Generic results of pricing an instrument.
///
/// Contains the NPV and optionally additional named results
/// (e.g. "delta", "gamma", "vega").
#[derive(Debug, Clone, Default)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Additional named results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: HashMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// Base trait for all pricing engines.
///
/// A pricing engine computes a results record for a specific instrument
/// type. Engines are immutable configurations, so one instance can price
/// several instruments concurrently.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// The results record this engine produces.
    type Results;

    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<Self::Results>;
}

/// Base trait for all financial instruments.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// Time of the last relevant event, in years from valuation.
    fn maturity_time(&self) -> Time;

    /// Whether the instrument is expired (maturity not after valuation).
    fn is_expired(&self) -> bool {
        self.maturity_time() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_results_builder() {
        let r = PricingResults::from_npv(42.0)
            .with_result("delta", 0.55)
            .with_result("gamma", 0.02);
        assert!((r.npv - 42.0).abs() < 1e-15);
        assert_eq!(r.result("delta"), Some(0.55));
        assert_eq!(r.result("vega"), None);
    }
}
