//! In-sample residual diagnostics for fitted models.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Residual summary reported alongside a forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDiagnostics {
    /// Variance of the in-sample residuals (model space).
    pub residual_variance: f64,
    /// Portmanteau test on residual autocorrelation, if computable.
    pub ljung_box: Option<LjungBox>,
}

/// Ljung–Box test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjungBox {
    pub lags: usize,
    pub statistic: f64,
    pub p_value: f64,
}

/// Population variance of the residuals, `None` for fewer than two.
pub fn residual_variance(residuals: &[f64]) -> Option<f64> {
    if residuals.len() < 2 {
        return None;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    Some(residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n)
}

/// Sample autocorrelation at `lag`.
fn autocorrelation(centered: &[f64], denom: f64, lag: usize) -> f64 {
    centered[lag..]
        .iter()
        .zip(centered.iter())
        .map(|(a, b)| a * b)
        .sum::<f64>()
        / denom
}

/// Ljung–Box Q statistic over up to `max_lags` lags.
///
/// Degrees of freedom are the lag count minus `fitted_params` (the ARMA
/// coefficient count), floored at one. Returns `None` when the residuals
/// are too short or constant.
///
/// # Formula
/// Q = n(n+2) * Σ_{k=1..h} r_k² / (n-k)
pub fn ljung_box(residuals: &[f64], max_lags: usize, fitted_params: usize) -> Option<LjungBox> {
    let n = residuals.len();
    if n < 3 || max_lags == 0 {
        return None;
    }
    let lags = max_lags.min(n - 1);

    let mean = residuals.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = residuals.iter().map(|r| r - mean).collect();
    let denom: f64 = centered.iter().map(|c| c * c).sum();
    if denom <= f64::EPSILON {
        return None;
    }

    let nf = n as f64;
    let statistic = nf
        * (nf + 2.0)
        * (1..=lags)
            .map(|k| autocorrelation(&centered, denom, k).powi(2) / (nf - k as f64))
            .sum::<f64>();

    let dof = lags.saturating_sub(fitted_params).max(1);
    let p_value = ChiSquared::new(dof as f64)
        .ok()
        .map(|dist| 1.0 - dist.cdf(statistic))?;

    Some(LjungBox {
        lags,
        statistic,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_residual_variance() {
        assert_eq!(residual_variance(&[1.0]), None);
        assert_relative_eq!(
            residual_variance(&[1.0, 2.0, 3.0, 4.0]).unwrap(),
            1.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ljung_box_detects_autocorrelation() {
        // Slow sine: heavily autocorrelated
        let correlated: Vec<f64> = (0..60).map(|i| (i as f64 * 0.2).sin()).collect();
        let lb = ljung_box(&correlated, 10, 2).unwrap();
        assert_eq!(lb.lags, 10);
        assert!(lb.statistic > 50.0);
        assert!(lb.p_value < 0.01);
    }

    #[test]
    fn test_ljung_box_alternating_series() {
        // Alternating signs: r_1 close to -1, so Q is large as well
        let alternating: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let lb = ljung_box(&alternating, 5, 0).unwrap();
        assert!(lb.p_value < 0.01);
        assert!((0.0..=1.0).contains(&lb.p_value));
    }

    #[test]
    fn test_ljung_box_degenerate_inputs() {
        assert!(ljung_box(&[1.0, 2.0], 10, 0).is_none());
        assert!(ljung_box(&[3.0; 20], 10, 0).is_none());
        assert!(ljung_box(&[1.0, 2.0, 0.5, 1.5], 0, 0).is_none());
    }
}
