//! Error types for quantlib-fd.
//!
//! Every crate in the workspace reports failures through the single
//! `thiserror`-derived [`Error`] enum below. Precondition checks go through
//! the `ensure!` macro, unconditional failures through `fail!`.
//!
//! A failed pricing call never yields a partially filled result: errors are
//! raised where they are detected and propagated with `?`.

use thiserror::Error;

/// The top-level error type used throughout quantlib-fd.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated (invalid counts, inverted intervals,
    /// degenerate grids, unsorted schedules).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Two sequences that must be paired element by element have
    /// different lengths.
    #[error("size mismatch between {what}: {left} vs {right}")]
    SizeMismatch {
        /// Description of the two sequences.
        what: String,
        /// Length of the first sequence.
        left: usize,
        /// Length of the second sequence.
        right: usize,
    },

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// Argument outside the domain of a function (e.g. a probability
    /// outside `(0, 1)`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The supplied objects cannot be combined, e.g. an engine that needs a
    /// closed-form comparable was given a payoff without a strike.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Shorthand `Result` type used throughout quantlib-fd.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::ensure_post;
/// fn halve(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x / 2.0;
///     ensure_post!(result.is_finite(), "result must be finite, got {result}");
///     Ok(result)
/// }
/// assert!(halve(1.0).is_ok());
/// assert!(halve(f64::INFINITY).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::fail;
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

/// Returns `Err(Error::SizeMismatch { .. })` unless the two lengths agree.
///
/// # Example
/// ```
/// use ql_core::{ensure_same_size, errors::Error};
/// fn pair(a: &[f64], b: &[f64]) -> ql_core::errors::Result<usize> {
///     ensure_same_size!(a.len(), b.len(), "dates and amounts");
///     Ok(a.len())
/// }
/// assert_eq!(pair(&[1.0], &[2.0]), Ok(1));
/// assert!(matches!(pair(&[1.0], &[]), Err(Error::SizeMismatch { .. })));
/// ```
#[macro_export]
macro_rules! ensure_same_size {
    ($left:expr, $right:expr, $what:expr) => {{
        let (left, right): (usize, usize) = ($left, $right);
        if left != right {
            return Err($crate::errors::Error::SizeMismatch {
                what: ($what).to_string(),
                left,
                right,
            });
        }
    }};
}
