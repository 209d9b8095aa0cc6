//! `YieldTermStructure`: interest-rate term structures.
//!
//! This module defines the `YieldTermStructure` trait together with the three
//! fundamental quantities any yield curve must provide:
//!
//! * **discount factor**: `P(0,t)`
//! * **zero rate**: the continuously-compounded zero rate for maturity *t*
//! * **forward rate**: the continuously-compounded forward rate between two
//!   times, or the instantaneous forward when they coincide
//!
//! Dividend yields are modelled with the same trait: the "discount" of a
//! dividend curve is the factor `exp(-q t)` applied to the spot.

use crate::term_structure::TermStructure;
use ql_core::{DiscountFactor, Rate, Real, Time};

/// Small time step used for instantaneous forward rate computations.
const DT: Real = 1.0e-4;

/// A yield (interest-rate) term structure.
///
/// Implementors must provide **at least one** of the three low-level
/// methods:
///
/// * [`discount_impl`](YieldTermStructure::discount_impl)
/// * [`zero_rate_impl`](YieldTermStructure::zero_rate_impl)
/// * [`forward_rate_impl`](YieldTermStructure::forward_rate_impl) together
///   with `discount_impl`
///
/// The defaults derive the others through the relationships connecting them.
pub trait YieldTermStructure: TermStructure {
    // ── Low-level impl hooks ─────────────────────────────────────────────

    /// Return the discount factor for a given time `t`.
    ///
    /// Default: computed from `zero_rate_impl`.
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        if t == 0.0 {
            return 1.0;
        }
        let r = self.zero_rate_impl(t);
        (-r * t).exp()
    }

    /// Return the continuously-compounded zero rate for time `t`.
    ///
    /// Default: computed from `discount_impl`.
    fn zero_rate_impl(&self, t: Time) -> Rate {
        if t == 0.0 {
            return self.forward_rate_impl(0.0);
        }
        let df = self.discount_impl(t);
        -df.ln() / t
    }

    /// Return the instantaneous forward rate at time `t`.
    ///
    /// Default: central difference of `-ln P(t)`.
    fn forward_rate_impl(&self, t: Time) -> Rate {
        let t1 = (t - DT / 2.0).max(0.0);
        let t2 = t1 + DT;
        let df1 = self.discount_impl(t1);
        let df2 = self.discount_impl(t2);
        (df1.ln() - df2.ln()) / (t2 - t1)
    }

    // ── Public interface ─────────────────────────────────────────────────

    /// Discount factor for a time.
    fn discount(&self, t: Time) -> DiscountFactor {
        self.discount_impl(t)
    }

    /// Continuously-compounded zero rate for time `t`.
    fn zero_rate(&self, t: Time) -> Rate {
        self.zero_rate_impl(t)
    }

    /// Continuously-compounded forward rate between `t1` and `t2`.
    ///
    /// When the two times coincide the instantaneous forward at `t1` is
    /// returned.
    fn forward_rate(&self, t1: Time, t2: Time) -> Rate {
        if (t2 - t1).abs() < DT * 1e-4 {
            return self.forward_rate_impl(t1);
        }
        let (lo, hi) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        (self.discount_impl(lo) / self.discount_impl(hi)).ln() / (hi - lo)
    }
}
