//! Standard normal density and distribution helpers.

/// Standard normal probability density function.
#[must_use]
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Standard normal cumulative distribution function.
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_pdf_at_zero() {
        assert!((normal_pdf(0.0) - 0.398_942_280_401_432_7).abs() < EPSILON);
    }

    #[test]
    fn test_pdf_is_symmetric() {
        assert!((normal_pdf(1.3) - normal_pdf(-1.3)).abs() < EPSILON);
    }

    #[test]
    fn test_cdf_known_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < EPSILON);
        assert!((normal_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-12);
        assert!((normal_cdf(-1.0) + normal_cdf(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cdf_tails() {
        assert!(normal_cdf(-8.0) < 1e-14);
        assert!(normal_cdf(8.0) > 1.0 - 1e-14);
    }
}
