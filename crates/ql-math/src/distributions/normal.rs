//! Normal (Gaussian) distribution: density, cumulative and two inverse
//! cumulative approximations.
//!
//! All types are plain `Copy` values holding `(average, sigma)`; evaluating
//! them has no side effects, so a single instance can be shared freely
//! between threads.

use ql_core::{errors::Error, errors::Result, Real};
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Threshold below which the cumulative switches to the asymptotic tail
/// expansion. The series is divergent; its smallest term is about
/// `exp(-z²/2)`, so it only reaches double precision once `Φ(z)` is this
/// small.
const TAIL_THRESHOLD: Real = 1e-20;

fn check_sigma(sigma: Real) -> Result<()> {
    ql_core::ensure!(sigma > 0.0, "sigma must be greater than 0.0 ({sigma} not allowed)");
    Ok(())
}

fn check_probability(x: Real, name: &str) -> Result<()> {
    if x > 0.0 && x < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{name}({x}) undefined: must be 0 < x < 1"
        )))
    }
}

// ── Density ───────────────────────────────────────────────────────────────────

/// Normal density with the given mean and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDistribution {
    average: Real,
    sigma: Real,
}

impl NormalDistribution {
    /// Create a normal density.
    ///
    /// # Errors
    /// `sigma` must be strictly positive.
    pub fn new(average: Real, sigma: Real) -> Result<Self> {
        check_sigma(sigma)?;
        Ok(Self { average, sigma })
    }

    /// The standard normal density.
    pub fn standard() -> Self {
        Self {
            average: 0.0,
            sigma: 1.0,
        }
    }

    /// Density at `x`.
    pub fn value(&self, x: Real) -> Real {
        let dx = (x - self.average) / self.sigma;
        (-0.5 * dx * dx).exp() / ((2.0 * PI).sqrt() * self.sigma)
    }

    /// First derivative of the density at `x`.
    pub fn derivative(&self, x: Real) -> Real {
        self.value(x) * (self.average - x) / (self.sigma * self.sigma)
    }
}

// ── Cumulative ────────────────────────────────────────────────────────────────

/// Cumulative normal distribution.
///
/// The body is computed from the complementary error function, which keeps
/// full relative precision in the left tail; below `1e-20` the result
/// switches to the asymptotic expansion of Abramowitz & Stegun (26.2.12).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulativeNormalDistribution {
    average: Real,
    sigma: Real,
}

impl CumulativeNormalDistribution {
    /// Create a cumulative normal.
    ///
    /// # Errors
    /// `sigma` must be strictly positive.
    pub fn new(average: Real, sigma: Real) -> Result<Self> {
        check_sigma(sigma)?;
        Ok(Self { average, sigma })
    }

    /// The standard cumulative normal `Φ`.
    pub fn standard() -> Self {
        Self {
            average: 0.0,
            sigma: 1.0,
        }
    }

    /// `P(X ≤ z)`.
    pub fn value(&self, z: Real) -> Real {
        let z = (z - self.average) / self.sigma;
        let result = 0.5 * erfc(-z * FRAC_1_SQRT_2);
        if result > TAIL_THRESHOLD {
            return result;
        }

        let zsqr = z * z;
        let mut sum = 1.0;
        let mut g = 1.0;
        let mut i = 1.0;
        let mut a = Real::MAX;
        loop {
            let last_a = a;
            let x = (4.0 * i - 3.0) / zsqr;
            let y = x * ((4.0 * i - 1.0) / zsqr);
            a = g * (x - y);
            sum -= a;
            g *= y;
            i += 1.0;
            a = a.abs();
            if !(last_a > a && a >= (sum * Real::EPSILON).abs()) {
                break;
            }
        }
        -NormalDistribution::standard().value(z) / z * sum
    }

    /// Density of the distribution at `z`.
    pub fn derivative(&self, z: Real) -> Real {
        let xn = (z - self.average) / self.sigma;
        NormalDistribution::standard().value(xn) / self.sigma
    }
}

// ── Inverse cumulative (Acklam) ───────────────────────────────────────────────

const A: [Real; 6] = [
    -3.969_683_028_665_376e+01,
    2.209_460_984_245_205e+02,
    -2.759_285_104_469_687e+02,
    1.383_577_518_672_690e+02,
    -3.066_479_806_614_716e+01,
    2.506_628_277_459_239e+00,
];
const B: [Real; 5] = [
    -5.447_609_879_822_406e+01,
    1.615_858_368_580_409e+02,
    -1.556_989_798_598_866e+02,
    6.680_131_188_771_972e+01,
    -1.328_068_155_288_572e+01,
];
const C: [Real; 6] = [
    -7.784_894_002_430_293e-03,
    -3.223_964_580_411_365e-01,
    -2.400_758_277_161_838e+00,
    -2.549_732_539_343_734e+00,
    4.374_664_141_464_968e+00,
    2.938_163_982_698_783e+00,
];
const D: [Real; 4] = [
    7.784_695_709_041_462e-03,
    3.224_671_290_700_398e-01,
    2.445_134_137_142_996e+00,
    3.754_408_661_907_416e+00,
];
const X_LOW: Real = 0.02425;
const X_HIGH: Real = 1.0 - X_LOW;

/// Inverse cumulative normal, Peter Acklam's rational approximation.
///
/// The relative error of the approximation is below `1.15e-9`. No
/// Newton/Halley refinement is applied to the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseCumulativeNormal {
    average: Real,
    sigma: Real,
}

impl InverseCumulativeNormal {
    /// Create an inverse cumulative normal.
    ///
    /// # Errors
    /// `sigma` must be strictly positive.
    pub fn new(average: Real, sigma: Real) -> Result<Self> {
        check_sigma(sigma)?;
        Ok(Self { average, sigma })
    }

    /// The standard inverse `Φ⁻¹`.
    pub fn standard() -> Self {
        Self {
            average: 0.0,
            sigma: 1.0,
        }
    }

    /// `z` such that `P(X ≤ z) = x`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] unless `0 < x < 1`.
    pub fn value(&self, x: Real) -> Result<Real> {
        check_probability(x, "InverseCumulativeNormal")?;

        let z = if x < X_LOW {
            let q = (-2.0 * x.ln()).sqrt();
            (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
                / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
        } else if x <= X_HIGH {
            let q = x - 0.5;
            let r = q * q;
            (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
                / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
        } else {
            let q = (-2.0 * (1.0 - x).ln()).sqrt();
            -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
                / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
        };

        Ok(self.average + z * self.sigma)
    }
}

// ── Inverse cumulative (Moro) ─────────────────────────────────────────────────

const MORO_A: [Real; 4] = [2.50662823884, -18.61500062529, 41.39119773534, -25.44106049637];
const MORO_B: [Real; 4] = [-8.47351093090, 23.08336743743, -21.06224101826, 3.13082909833];
const MORO_C: [Real; 9] = [
    0.3374754822726147,
    0.9761690190917186,
    0.1607979714918209,
    0.0276438810333863,
    0.0038405729373609,
    0.0003951896511919,
    0.0000321767881768,
    0.0000002888167364,
    0.0000003960315187,
];

/// Inverse cumulative normal after Moro (1995): Beasley–Springer in the
/// centre, a Chebyshev fit in `ln(−ln p)` in the tails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoroInverseCumulativeNormal {
    average: Real,
    sigma: Real,
}

impl MoroInverseCumulativeNormal {
    /// Create a Moro inverse cumulative normal.
    ///
    /// # Errors
    /// `sigma` must be strictly positive.
    pub fn new(average: Real, sigma: Real) -> Result<Self> {
        check_sigma(sigma)?;
        Ok(Self { average, sigma })
    }

    /// The standard Moro inverse.
    pub fn standard() -> Self {
        Self {
            average: 0.0,
            sigma: 1.0,
        }
    }

    /// `z` such that `P(X ≤ z) ≈ x`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] unless `0 < x < 1`.
    pub fn value(&self, x: Real) -> Result<Real> {
        check_probability(x, "MoroInverseCumulativeNormal")?;

        let temp = x - 0.5;
        let result = if temp.abs() < 0.42 {
            let r = temp * temp;
            temp * (((MORO_A[3] * r + MORO_A[2]) * r + MORO_A[1]) * r + MORO_A[0])
                / ((((MORO_B[3] * r + MORO_B[2]) * r + MORO_B[1]) * r + MORO_B[0]) * r + 1.0)
        } else {
            let tail = if x < 0.5 { x } else { 1.0 - x };
            let r = (-tail.ln()).ln();
            let poly = MORO_C
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * r + c);
            if x < 0.5 {
                -poly
            } else {
                poly
            }
        };

        Ok(self.average + result * self.sigma)
    }
}

// ── Free-function shortcuts ───────────────────────────────────────────────────

/// The standard normal probability density function `φ(x)`.
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    NormalDistribution::standard().value(x)
}

/// The standard normal cumulative distribution function `Φ(x)`.
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    CumulativeNormalDistribution::standard().value(x)
}

/// The inverse standard normal CDF.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] unless `0 < p < 1`.
#[inline]
pub fn normal_cdf_inverse(p: Real) -> Result<Real> {
    InverseCumulativeNormal::standard().value(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_pdf_at_zero() {
        let expected = 1.0 / (2.0 * PI).sqrt();
        assert!((normal_pdf(0.0) - expected).abs() < 1e-15);
    }

    #[test]
    fn density_derivative_matches_finite_difference() {
        let n = NormalDistribution::new(0.3, 1.7).unwrap();
        let h = 1e-5;
        for x in [-2.0, -0.1, 0.3, 1.4, 4.0] {
            let fd = (n.value(x + h) - n.value(x - h)) / (2.0 * h);
            assert!((n.derivative(x) - fd).abs() < 1e-8, "at x={x}");
        }
    }

    #[test]
    fn cumulative_known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert_relative_eq!(normal_cdf(1.0), 0.841_344_746_068_542_9, max_relative = 1e-12);
        assert_relative_eq!(normal_cdf(-1.96), 0.024_997_895_148_220_43, max_relative = 1e-10);
        assert!((normal_cdf(10.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn cumulative_tail_keeps_relative_precision() {
        // Φ(-6), Φ(-8), Φ(-10) from high-precision tables
        assert_relative_eq!(normal_cdf(-6.0), 9.865_876_450_376_946e-10, max_relative = 1e-12);
        assert_relative_eq!(normal_cdf(-8.0), 6.220_960_574_271_785e-16, max_relative = 1e-12);
        assert_relative_eq!(normal_cdf(-10.0), 7.619_853_024_160_527e-24, max_relative = 1e-12);
        assert!(normal_cdf(-40.0) >= 0.0);
    }

    #[test]
    fn asymptotic_series_joins_the_error_function() {
        for z in [-9.4, -9.5, -11.0] {
            let erfc_value = 0.5 * erfc(-z * FRAC_1_SQRT_2);
            assert_relative_eq!(normal_cdf(z), erfc_value, max_relative = 1e-12);
        }
    }

    #[test]
    fn cumulative_with_location_and_scale() {
        let c = CumulativeNormalDistribution::new(1.0, 2.0).unwrap();
        assert_relative_eq!(c.value(3.0), normal_cdf(1.0), max_relative = 1e-15);
        assert_relative_eq!(c.derivative(3.0), normal_pdf(1.0) / 2.0, max_relative = 1e-15);
    }

    #[test]
    fn inverse_rejects_out_of_domain() {
        let inv = InverseCumulativeNormal::standard();
        for p in [0.0, 1.0, -0.1, 1.5] {
            assert!(matches!(inv.value(p), Err(Error::InvalidArgument(_))), "p={p}");
        }
        assert!(MoroInverseCumulativeNormal::standard().value(0.0).is_err());
        assert!(CumulativeNormalDistribution::new(0.0, 0.0).is_err());
    }


    #[test]
    fn inverse_with_location_and_scale() {
        let inv = InverseCumulativeNormal::new(1.0, 2.0).unwrap();
        assert!((inv.value(0.5).unwrap() - 1.0).abs() < 1e-12);
        assert_relative_eq!(
            inv.value(0.975).unwrap(),
            1.0 + 2.0 * 1.959_963_984_540_054,
            max_relative = 1e-8
        );
    }

    #[test]
    fn moro_agrees_with_acklam() {
        let acklam = InverseCumulativeNormal::standard();
        let moro = MoroInverseCumulativeNormal::standard();
        for p in [1e-6, 0.001, 0.05, 0.3, 0.5, 0.77, 0.95, 0.999, 1.0 - 1e-6] {
            let a = acklam.value(p).unwrap();
            let m = moro.value(p).unwrap();
            assert!((a - m).abs() < 1e-6, "p={p}: {a} vs {m}");
        }
    }
}
