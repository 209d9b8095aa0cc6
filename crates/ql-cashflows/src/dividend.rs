//! Discrete dividends.
//!
//! A dividend is paid at a time `t` (in years from valuation) and lowers the
//! underlying by its amount on the ex-dividend date. Two kinds exist: a
//! fixed cash amount, and a fraction of the underlying level.
//!
//! The set of kinds is closed, so consumers dispatch on the enum directly.

use ql_core::{Real, Result, Time};

/// A discrete dividend event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dividend {
    /// A fixed cash amount paid at `time`.
    Fixed {
        /// Cash amount.
        amount: Real,
        /// Payment time.
        time: Time,
    },
    /// A dividend of `rate · S` paid at `time`.
    Fractional {
        /// Fraction of the underlying paid out.
        rate: Real,
        /// Payment time.
        time: Time,
    },
}

impl Dividend {
    /// A fixed cash dividend.
    pub fn fixed(amount: Real, time: Time) -> Self {
        Self::Fixed { amount, time }
    }

    /// A dividend proportional to the underlying level.
    pub fn fractional(rate: Real, time: Time) -> Self {
        Self::Fractional { rate, time }
    }

    /// The payment time.
    pub fn time(&self) -> Time {
        match *self {
            Self::Fixed { time, .. } | Self::Fractional { time, .. } => time,
        }
    }

    /// The amount paid when the underlying is at `underlying`.
    pub fn amount(&self, underlying: Real) -> Real {
        match *self {
            Self::Fixed { amount, .. } => amount,
            Self::Fractional { rate, .. } => rate * underlying,
        }
    }
}

/// Pair dividend times with cash amounts.
///
/// # Errors
/// Returns [`Error::SizeMismatch`](ql_core::Error::SizeMismatch) if the two
/// sequences differ in length; no partial schedule is produced.
pub fn dividend_vector(times: &[Time], amounts: &[Real]) -> Result<Vec<Dividend>> {
    ql_core::ensure_same_size!(times.len(), amounts.len(), "dividend dates and amounts");
    Ok(times
        .iter()
        .zip(amounts.iter())
        .map(|(&time, &amount)| Dividend::fixed(amount, time))
        .collect())
}

/// A validated, time-ordered list of dividends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSchedule {
    dividends: Vec<Dividend>,
}

impl DividendSchedule {
    /// Build a schedule, sorting the dividends by payment time.
    ///
    /// # Errors
    /// Any payment time that is negative or not finite, a negative or
    /// non-finite cash amount, or a fractional rate outside `[0, 1)`.
    pub fn new(mut dividends: Vec<Dividend>) -> Result<Self> {
        for d in &dividends {
            let t = d.time();
            ql_core::ensure!(t.is_finite() && t >= 0.0, "invalid dividend time {t}");
            match *d {
                Dividend::Fixed { amount, .. } => ql_core::ensure!(
                    amount.is_finite() && amount >= 0.0,
                    "invalid dividend amount {amount} at time {t}"
                ),
                Dividend::Fractional { rate, .. } => ql_core::ensure!(
                    (0.0..1.0).contains(&rate),
                    "dividend rate {rate} at time {t} must lie in [0, 1)"
                ),
            }
        }
        dividends.sort_by(|a, b| a.time().total_cmp(&b.time()));
        Ok(Self { dividends })
    }

    /// Build a schedule of fixed cash dividends from paired sequences.
    ///
    /// # Errors
    /// See [`dividend_vector`] and [`DividendSchedule::new`].
    pub fn from_cash(times: &[Time], amounts: &[Real]) -> Result<Self> {
        Self::new(dividend_vector(times, amounts)?)
    }

    /// The dividends, in payment order.
    pub fn dividends(&self) -> &[Dividend] {
        &self.dividends
    }

    /// The payment times, in order.
    pub fn times(&self) -> Vec<Time> {
        self.dividends.iter().map(Dividend::time).collect()
    }

    /// Number of dividends.
    pub fn len(&self) -> usize {
        self.dividends.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.dividends.is_empty()
    }

    /// Iterator over the dividends.
    pub fn iter(&self) -> impl Iterator<Item = &Dividend> {
        self.dividends.iter()
    }
}
