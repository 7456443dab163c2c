//! Chronological train/test partitioning.

use crate::error::{ForecastError, Result};
use crate::series::MonthlySeries;

/// Contiguous prefix/suffix partition of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: MonthlySeries,
    pub test: MonthlySeries,
}

/// Index where the test partition starts: `floor(len * (1 - test_fraction))`.
pub fn split_index(len: usize, test_fraction: f64) -> usize {
    let index = (len as f64 * (1.0 - test_fraction)).floor() as usize;
    index.min(len)
}

/// Split a series into a training prefix and a test suffix.
///
/// Either side may come out empty for very short series; the fit and
/// scoring stages report that with their own errors.
pub fn split(series: &MonthlySeries, test_fraction: f64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ForecastError::InvalidParameter {
            param: "test_fraction".to_string(),
            value: test_fraction.to_string(),
            reason: "must be in (0, 1)".to_string(),
        });
    }

    let index = split_index(series.len(), test_fraction);

    Ok(Split {
        train: series.slice(0..index),
        test: series.slice(index..series.len()),
    })
}
