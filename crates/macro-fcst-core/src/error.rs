//! Error types for the forecasting pipeline.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error types for pipeline operations.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source format error: {0}")]
    SourceFormat(String),

    #[error("Insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Model fit failure: {0}")]
    ModelFitFailure(String),

    #[error("Degenerate metric: {0}")]
    DegenerateMetric(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter '{param}' = '{value}': {reason}")]
    InvalidParameter {
        param: String,
        value: String,
        reason: String,
    },
}

impl ForecastError {
    /// Convert to a process exit code.
    pub fn to_code(&self) -> i32 {
        match self {
            ForecastError::SourceUnavailable(_) => 2,
            ForecastError::SourceFormat(_) => 3,
            ForecastError::InsufficientData { .. } => 4,
            ForecastError::ModelFitFailure(_) => 5,
            ForecastError::DegenerateMetric(_) => 6,
            ForecastError::InvalidInput(_) => 7,
            ForecastError::InvalidParameter { .. } => 8,
        }
    }
}
