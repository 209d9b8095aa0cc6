//! Probability distributions.
//!
//! Only the normal family is needed by the finite-difference engines and the
//! closed-form Black formula; the error function comes from `statrs`.

pub mod normal;

pub use normal::{
    normal_cdf, normal_cdf_inverse, normal_pdf, CumulativeNormalDistribution,
    InverseCumulativeNormal, MoroInverseCumulativeNormal, NormalDistribution,
};
