//! Forecast accuracy metrics.
//!
//! - **Scale-dependent metrics**: MAE, RMSE, Bias
//! - **Percentage metrics**: MAPE
//!
//! Both inputs are aligned point by point: same length, same months, same
//! order. Mismatched lengths are `InvalidInput`; empty inputs are
//! `DegenerateMetric`.

use crate::error::{ForecastError, Result};
use crate::indicator::Indicator;
use std::collections::BTreeMap;

/// Accuracy of one evaluation forecast against its test partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error, original units
    pub mae: f64,
    /// Mean Absolute Percentage Error, percent
    pub mape: f64,
    /// Root Mean Squared Error, original units
    pub rmse: f64,
    /// Mean of forecast minus actual, original units
    pub bias: f64,
}

/// Accuracy per indicator, filled once per indicator during evaluation.
pub type MetricsRecord = BTreeMap<Indicator, AccuracyMetrics>;

/// Calculates Mean Absolute Error between actual and predicted values.
///
/// # Formula
/// MAE = (1/n) * Σ|actual_i - forecast_i|
///
/// # Example
/// ```
/// use macro_fcst_core::metrics::mae;
/// let actual = vec![100.0, 200.0, 300.0];
/// let forecast = vec![110.0, 190.0, 300.0];
/// let error = mae(&actual, &forecast).unwrap();
/// assert!((error - 6.667).abs() < 0.001);
/// ```
pub fn mae(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Calculates Mean Absolute Percentage Error.
///
/// Every actual value is used; a zero actual makes the percentage
/// undefined and is reported as `DegenerateMetric` rather than skipped.
///
/// # Formula
/// MAPE = (100/n) * Σ|actual_i - forecast_i| / |actual_i|
pub fn mape(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    if let Some(pos) = actual.iter().position(|a| *a == 0.0) {
        return Err(ForecastError::DegenerateMetric(format!(
            "MAPE undefined: actual value is zero at position {}",
            pos
        )));
    }
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| ((a - f) / a).abs())
        .sum();
    Ok(sum / actual.len() as f64 * 100.0)
}

/// Calculates Root Mean Squared Error between actual and predicted values.
///
/// # Formula
/// RMSE = sqrt((1/n) * Σ(actual_i - forecast_i)²)
pub fn rmse(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    Ok((sum / actual.len() as f64).sqrt())
}

/// Calculates Forecast Bias (mean error).
///
/// Positive bias means forecasts are too high on average.
///
/// # Formula
/// Bias = (1/n) * Σ(forecast_i - actual_i)
pub fn bias(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual.iter().zip(forecast.iter()).map(|(a, f)| f - a).sum();
    Ok(sum / actual.len() as f64)
}

/// All accuracy metrics for one aligned actual/forecast pair.
pub fn evaluate(actual: &[f64], forecast: &[f64]) -> Result<AccuracyMetrics> {
    Ok(AccuracyMetrics {
        mae: mae(actual, forecast)?,
        mape: mape(actual, forecast)?,
        rmse: rmse(actual, forecast)?,
        bias: bias(actual, forecast)?,
    })
}

fn validate_inputs(actual: &[f64], forecast: &[f64]) -> Result<()> {
    if actual.len() != forecast.len() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual and forecast arrays must have the same length: {} vs {}",
            actual.len(),
            forecast.len()
        )));
    }
    if actual.is_empty() {
        return Err(ForecastError::DegenerateMetric(
            "no points to score: empty test partition".to_string(),
        ));
    }
    Ok(())
}
