//! Core library for monthly ARIMA forecasting of Brazilian market and
//! macro indicators.
//!
//! The crate takes raw source series through month-end normalisation,
//! alignment, chronological splitting, per-indicator ARIMA fitting and
//! accuracy scoring. Network access and rendering live behind the
//! [`SeriesSource`] and [`ChartSink`] traits.

pub mod align;
pub mod chart;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod forecast;
pub mod indicator;
pub mod metrics;
pub mod pipeline;
pub mod resample;
pub mod series;
pub mod split;

// Re-exports for convenience
pub use align::{align, AlignedTable};
pub use chart::{Chart, ChartLine, ChartSink, LineStyle, NullSink};
pub use config::PipelineConfig;
pub use diagnostics::{FitDiagnostics, LjungBox};
pub use error::{ForecastError, Result};
pub use forecast::{fit_and_forecast, ArimaOrder, ForecastSeries, Transform};
pub use indicator::{Indicator, IndicatorSpec, SourceSpec};
pub use metrics::{bias, evaluate, mae, mape, rmse, AccuracyMetrics, MetricsRecord};
pub use pipeline::{
    acquire, evaluate_indicator, forecast_indicator, normalize, run, Evaluation, IndicatorRun,
    RunReport, SeriesSource,
};
pub use resample::{following_month_ends, month_end, to_month_end};
pub use series::{MonthlySeries, Observation, RawSeries};
pub use split::{split, split_index, Split};
