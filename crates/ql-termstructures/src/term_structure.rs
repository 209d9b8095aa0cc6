//! `TermStructure`: base trait for all term structures.
//!
//! Every curve is queried by time, in years, from the valuation time `t = 0`.
//! Curves report the latest time they cover; queries past it extrapolate.

use ql_core::{errors::Result, Time};

/// Base trait for all term structures.
pub trait TermStructure: std::fmt::Debug + Send + Sync {
    /// The latest time for which the curve is defined without extrapolation.
    fn max_time(&self) -> Time {
        Time::MAX
    }

    /// Check that `t` can be queried.
    ///
    /// Negative times are always rejected; times past
    /// [`max_time`](Self::max_time) are accepted only when `extrapolate` is set.
    fn check_range(&self, t: Time, extrapolate: bool) -> Result<()> {
        ql_core::ensure!(t >= 0.0, "negative time ({t}) given");
        ql_core::ensure!(
            extrapolate || t <= self.max_time(),
            "time ({t}) is past max curve time ({})",
            self.max_time()
        );
        Ok(())
    }
}
