//! Floating-point comparison helpers.
//!
//! Rollback code compares times that come out of repeated subtraction, so
//! exact equality is never safe there.

use ql_core::Real;

/// Return `true` if `|a - b| <= tolerance`.
#[inline]
pub fn close(a: Real, b: Real, tolerance: Real) -> bool {
    (a - b).abs() <= tolerance
}

/// Return `true` if `a` and `b` agree to within `n` machine epsilons,
/// relative to the larger magnitude.
///
/// Two exact zeros compare equal; a zero against a non-zero never does.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let tolerance = Real::from(n) * Real::EPSILON;
    if a == 0.0 || b == 0.0 {
        return diff < tolerance * tolerance;
    }
    diff <= tolerance * a.abs() || diff <= tolerance * b.abs()
}
