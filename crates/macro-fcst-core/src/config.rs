//! Run configuration.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// Fixed parameters of a pipeline run.
///
/// Passed by reference into every stage; nothing reads module-level
/// constants.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// First day of market history requested (inclusive).
    pub history_start: NaiveDate,
    /// Last day of market history requested (exclusive at the source).
    pub history_end: NaiveDate,
    /// Months forecast past the end of the aligned history.
    pub horizon: usize,
    /// Share of each column held out for evaluation.
    pub test_fraction: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_start: NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid calendar date"),
            history_end: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid calendar date"),
            horizon: 24,
            test_fraction: 0.2,
        }
    }
}

impl PipelineConfig {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.history_start >= self.history_end {
            return Err(ForecastError::InvalidParameter {
                param: "history_start".to_string(),
                value: self.history_start.to_string(),
                reason: format!("must be before history_end ({})", self.history_end),
            });
        }

        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter {
                param: "horizon".to_string(),
                value: self.horizon.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ForecastError::InvalidParameter {
                param: "test_fraction".to_string(),
                value: self.test_fraction.to_string(),
                reason: "must be in (0, 1)".to_string(),
            });
        }

        Ok(())
    }
}
