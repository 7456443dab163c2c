//! Time-indexed series types.
//!
//! [`RawSeries`] holds observations exactly as a source reported them (daily
//! closes, or macro prints on their publication dates). [`MonthlySeries`] is
//! the month-end view used by everything downstream of the normalizer.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::ops::Range;

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Observations from one source query, dates strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    name: String,
    observations: Vec<Observation>,
}

impl RawSeries {
    /// Build a raw series, rejecting unordered or duplicate dates and
    /// non-finite values.
    pub fn new(name: impl Into<String>, observations: Vec<Observation>) -> Result<Self> {
        let name = name.into();

        if let Some(bad) = observations.iter().find(|o| !o.value.is_finite()) {
            return Err(ForecastError::SourceFormat(format!(
                "{}: non-finite value on {}",
                name, bad.date
            )));
        }

        if let Some(w) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::SourceFormat(format!(
                "{}: dates not strictly increasing ({} followed by {})",
                name, w[0].date, w[1].date
            )));
        }

        Ok(Self { name, observations })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// One value per calendar month, labelled by the month's last day.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    name: String,
    months: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Build a monthly series from parallel month labels and values.
    ///
    /// Labels must be strictly increasing and fall in distinct months.
    pub fn new(name: impl Into<String>, months: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();

        if months.len() != values.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{}: {} month labels for {} values",
                name,
                months.len(),
                values.len()
            )));
        }

        if let Some(w) = months
            .windows(2)
            .find(|w| crate::resample::month_key(w[1]) <= crate::resample::month_key(w[0]))
        {
            return Err(ForecastError::InvalidInput(format!(
                "{}: months not strictly increasing ({} followed by {})",
                name, w[0], w[1]
            )));
        }

        Ok(Self {
            name,
            months,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_month(&self) -> Option<NaiveDate> {
        self.months.last().copied()
    }

    /// Multiply every value by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            name: self.name.clone(),
            months: self.months.clone(),
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }

    /// Contiguous sub-series over a positional range.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            name: self.name.clone(),
            months: self.months[range.clone()].to_vec(),
            values: self.values[range].to_vec(),
        }
    }

    /// Iterate `(month, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.months.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_raw_series_accepts_increasing_dates() {
        let series = RawSeries::new(
            "CDI",
            vec![
                Observation::new(date(2024, 1, 2), 0.04),
                Observation::new(date(2024, 1, 3), 0.05),
            ],
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(date(2024, 1, 2)));
        assert_eq!(series.last_date(), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_raw_series_rejects_duplicate_dates() {
        let result = RawSeries::new(
            "CDI",
            vec![
                Observation::new(date(2024, 1, 2), 0.04),
                Observation::new(date(2024, 1, 2), 0.05),
            ],
        );
        assert!(matches!(result, Err(ForecastError::SourceFormat(_))));
    }

    #[test]
    fn test_raw_series_rejects_nan() {
        let result = RawSeries::new("IBOV", vec![Observation::new(date(2024, 1, 2), f64::NAN)]);
        assert!(matches!(result, Err(ForecastError::SourceFormat(_))));
    }

    #[test]
    fn test_monthly_series_rejects_same_month_twice() {
        let result = MonthlySeries::new(
            "IPCA",
            vec![date(2024, 1, 15), date(2024, 1, 31)],
            vec![0.4, 0.5],
        );
        assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
    }

    #[test]
    fn test_monthly_series_slice_and_scale() {
        let series = MonthlySeries::new(
            "IPCA",
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)],
            vec![40.0, 80.0, 120.0],
        )
        .unwrap();

        let tail = series.slice(1..3).scaled(0.01);
        assert_eq!(tail.months(), &[date(2024, 2, 29), date(2024, 3, 31)]);
        assert_relative_eq!(tail.values()[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(tail.values()[1], 1.2, epsilon = 1e-12);
        assert_eq!(tail.name(), "IPCA");
    }
}
