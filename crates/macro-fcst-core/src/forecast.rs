//! ARIMA fit and forecast, wrapping the anofox-forecast crate.

use crate::diagnostics::{ljung_box, residual_variance, FitDiagnostics};
use crate::error::{ForecastError, Result};
use crate::resample::following_month_ends;
use crate::series::MonthlySeries;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use tracing::debug;

use anofox_forecast::core::TimeSeriesBuilder;
use anofox_forecast::models::arima::ARIMA;
use anofox_forecast::prelude::Forecaster;

/// Lags used for the residual portmanteau test.
const LJUNG_BOX_LAGS: usize = 10;

/// ARIMA (p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Fewest observations the order can be estimated from.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Value transform applied before fitting and undone on forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    /// Natural log in, exponential out. Inputs must be strictly positive.
    Log,
}

impl Transform {
    /// Map input values into model space.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>> {
        match self {
            Transform::Identity => Ok(values.to_vec()),
            Transform::Log => {
                if let Some(pos) = values.iter().position(|v| !(*v > 0.0)) {
                    return Err(ForecastError::InvalidInput(format!(
                        "log transform needs strictly positive values, got {} at position {}",
                        values[pos], pos
                    )));
                }
                Ok(values.iter().map(|v| v.ln()).collect())
            }
        }
    }

    /// Map a model-space value back to the original units.
    pub fn invert(&self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            Transform::Log => value.exp(),
        }
    }
}

/// Point forecasts with explicit month-end timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    /// Months following the fitted series' last month.
    pub months: Vec<NaiveDate>,
    /// Point forecasts in the original units.
    pub values: Vec<f64>,
    /// Model name used
    pub model_name: String,
    /// In-sample diagnostics, when residuals were available.
    pub diagnostics: Option<FitDiagnostics>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fit ARIMA on `series` and forecast `horizon` months past its end.
///
/// The fitted model lives only for the duration of this call.
///
/// # Errors
/// - `InvalidInput` if `transform` is `Log` and a value is not strictly positive
/// - `InsufficientData` if the series is shorter than the order needs
/// - `ModelFitFailure` if estimation fails or yields non-finite forecasts
pub fn fit_and_forecast(
    series: &MonthlySeries,
    order: ArimaOrder,
    horizon: usize,
    transform: Transform,
) -> Result<ForecastSeries> {
    let needed = order.min_observations();
    if series.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: series.len(),
        });
    }

    let last_month = series.last_month().ok_or(ForecastError::InsufficientData {
        needed,
        got: 0,
    })?;
    let months = following_month_ends(last_month, horizon)?;

    let model_values = transform.apply(series.values())?;

    // Create TimeSeries from month labels and values
    let time_series = TimeSeriesBuilder::new()
        .timestamps(month_timestamps(series)?)
        .values(model_values)
        .build()
        .map_err(|e| {
            ForecastError::ModelFitFailure(format!(
                "{}: failed to build TimeSeries: {}",
                series.name(),
                e
            ))
        })?;

    let mut model = ARIMA::new(order.p, order.d, order.q);

    model.fit(&time_series).map_err(|e| {
        ForecastError::ModelFitFailure(format!("{}: failed to fit {}: {}", series.name(), order, e))
    })?;

    let forecast = model.predict(horizon).map_err(|e| {
        ForecastError::ModelFitFailure(format!(
            "{}: failed to forecast {} steps: {}",
            series.name(),
            horizon,
            e
        ))
    })?;

    // Extract point forecasts (univariate - first dimension)
    let point = forecast.point().first().cloned().unwrap_or_default();
    if point.len() != horizon {
        return Err(ForecastError::ModelFitFailure(format!(
            "{}: expected {} forecast steps, model returned {}",
            series.name(),
            horizon,
            point.len()
        )));
    }
    if let Some(pos) = point.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::ModelFitFailure(format!(
            "{}: non-finite forecast at step {}",
            series.name(),
            pos + 1
        )));
    }

    let values: Vec<f64> = point.iter().map(|v| transform.invert(*v)).collect();

    let diagnostics = model
        .residuals()
        .map(|residuals| in_sample_residuals(residuals, order))
        .and_then(|residuals| diagnose(&residuals, order));

    if let Some(diag) = &diagnostics {
        debug!(
            series = series.name(),
            model = %order,
            sigma2 = diag.residual_variance,
            ljung_box_q = diag.ljung_box.map(|lb| lb.statistic),
            ljung_box_p = diag.ljung_box.map(|lb| lb.p_value),
            "Fitted model diagnostics"
        );
    }

    Ok(ForecastSeries {
        months,
        values,
        model_name: order.to_string(),
        diagnostics,
    })
}

/// Midnight UTC of each month label, as the model's time index.
fn month_timestamps(series: &MonthlySeries) -> Result<Vec<DateTime<Utc>>> {
    series
        .months()
        .iter()
        .map(|month| {
            month
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .ok_or_else(|| {
                    ForecastError::InvalidInput(format!(
                        "{}: no timestamp for month {}",
                        series.name(),
                        month
                    ))
                })
        })
        .collect()
}

/// One-step residuals of the differenced series.
///
/// The model reports zeros for the first `max(p, q)` positions, which it
/// cannot predict; those are dropped along with any non-finite entries.
fn in_sample_residuals(residuals: &[f64], order: ArimaOrder) -> Vec<f64> {
    residuals
        .iter()
        .skip(order.p.max(order.q))
        .copied()
        .filter(|r| r.is_finite())
        .collect()
}

fn diagnose(residuals: &[f64], order: ArimaOrder) -> Option<FitDiagnostics> {
    let residual_variance = residual_variance(residuals)?;
    Some(FitDiagnostics {
        residual_variance,
        ljung_box: ljung_box(residuals, LJUNG_BOX_LAGS, order.p + order.q),
    })
}
