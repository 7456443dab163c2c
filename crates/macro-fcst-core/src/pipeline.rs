//! End-to-end run: acquire, normalise, evaluate, forecast.
//!
//! Acquisition and normalisation failures end the run. Failures while
//! evaluating or forecasting one indicator are recorded in the report and
//! the remaining indicators still run.

use crate::align::{align, AlignedTable};
use crate::chart::{evaluation_chart, production_chart, ChartSink};
use crate::config::PipelineConfig;
use crate::error::{ForecastError, Result};
use crate::forecast::{fit_and_forecast, ForecastSeries};
use crate::indicator::{Indicator, SourceSpec};
use crate::metrics::{evaluate, AccuracyMetrics, MetricsRecord};
use crate::resample::to_month_end;
use crate::series::{MonthlySeries, RawSeries};
use crate::split::{split, Split};
use chrono::NaiveDate;
use tracing::{error, info};

/// Provider of raw indicator history.
pub trait SeriesSource {
    /// Daily adjusted closes for `symbol`, `start` inclusive, `end` exclusive.
    fn fetch_market_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries>;

    /// Full published history of a macro series.
    fn fetch_macro_series(&self, code: u32) -> Result<RawSeries>;
}

/// Evaluation-mode result for one indicator.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub split: Split,
    /// Forecast over the test months, fitted on train only.
    pub forecast: ForecastSeries,
    pub metrics: AccuracyMetrics,
}

/// Outcome of both modes for one indicator.
#[derive(Debug)]
pub struct IndicatorRun {
    pub indicator: Indicator,
    pub evaluation: Result<Evaluation>,
    pub forecast: Result<ForecastSeries>,
}

impl IndicatorRun {
    fn first_error(&self) -> Option<&ForecastError> {
        self.evaluation
            .as_ref()
            .err()
            .or_else(|| self.forecast.as_ref().err())
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub table: AlignedTable,
    pub runs: Vec<IndicatorRun>,
}

impl RunReport {
    /// MAE/MAPE per successfully evaluated indicator.
    pub fn metrics(&self) -> MetricsRecord {
        self.runs
            .iter()
            .filter_map(|run| {
                run.evaluation
                    .as_ref()
                    .ok()
                    .map(|eval| (run.indicator, eval.metrics))
            })
            .collect()
    }

    /// Future forecasts per successfully forecast indicator.
    pub fn forecasts(&self) -> impl Iterator<Item = (Indicator, &ForecastSeries)> + '_ {
        self.runs
            .iter()
            .filter_map(|run| run.forecast.as_ref().ok().map(|f| (run.indicator, f)))
    }

    /// Indicators with at least one failed mode, with the first error.
    pub fn failures(&self) -> impl Iterator<Item = (Indicator, &ForecastError)> + '_ {
        self.runs
            .iter()
            .filter_map(|run| run.first_error().map(|e| (run.indicator, e)))
    }

    /// Process exit code: 0 when every indicator succeeded, else the code of
    /// the first failure.
    pub fn exit_code(&self) -> i32 {
        self.failures().next().map(|(_, e)| e.to_code()).unwrap_or(0)
    }
}

/// Fetch raw history for each indicator, one source call each.
pub fn acquire<S: SeriesSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> Result<Vec<(Indicator, RawSeries)>> {
    Indicator::ALL
        .iter()
        .map(|indicator| {
            let raw = match indicator.spec().source {
                SourceSpec::Market { symbol } => {
                    source.fetch_market_series(symbol, config.history_start, config.history_end)?
                }
                SourceSpec::Macro { code } => source.fetch_macro_series(code)?,
            };

            if raw.is_empty() {
                return Err(ForecastError::SourceFormat(format!(
                    "{}: source returned no observations",
                    indicator
                )));
            }

            info!(
                indicator = %indicator,
                rows = raw.len(),
                first = ?raw.first_date(),
                last = ?raw.last_date(),
                "Fetched raw series"
            );
            Ok((*indicator, raw))
        })
        .collect()
}

/// Resample each raw series to month-end, apply unit scaling and align.
pub fn normalize(raw: &[(Indicator, RawSeries)]) -> Result<AlignedTable> {
    let monthly = raw
        .iter()
        .map(|(indicator, series)| {
            let monthly = to_month_end(series)?.scaled(indicator.spec().scale);
            Ok((*indicator, monthly))
        })
        .collect::<Result<Vec<(Indicator, MonthlySeries)>>>()?;

    align(&monthly)
}

/// Fit on the training prefix and score a forecast of the test suffix.
pub fn evaluate_indicator(
    table: &AlignedTable,
    indicator: Indicator,
    config: &PipelineConfig,
) -> Result<Evaluation> {
    let spec = indicator.spec();
    let series = table.require_column(indicator)?;
    let split = split(&series, config.test_fraction)?;

    let forecast = fit_and_forecast(&split.train, spec.order, split.test.len(), spec.transform)?;

    if forecast.months != split.test.months() {
        return Err(ForecastError::InvalidInput(format!(
            "{}: forecast months do not line up with the test partition",
            indicator
        )));
    }

    let metrics = evaluate(split.test.values(), &forecast.values)?;

    Ok(Evaluation {
        split,
        forecast,
        metrics,
    })
}

/// Fit on the full column and forecast the configured horizon.
pub fn forecast_indicator(
    table: &AlignedTable,
    indicator: Indicator,
    config: &PipelineConfig,
) -> Result<ForecastSeries> {
    let spec = indicator.spec();
    let series = table.require_column(indicator)?;
    fit_and_forecast(&series, spec.order, config.horizon, spec.transform)
}

/// Run the whole pipeline.
pub fn run<S, C>(source: &S, sink: &mut C, config: &PipelineConfig) -> Result<RunReport>
where
    S: SeriesSource + ?Sized,
    C: ChartSink + ?Sized,
{
    config.validate()?;

    info!("Fetching data");
    let raw = acquire(source, config)?;
    let table = normalize(&raw)?;
    info!(
        months = table.len(),
        first = ?table.months().first(),
        last = ?table.months().last(),
        "Data ready for modelling"
    );

    let mut evaluations = Vec::with_capacity(Indicator::ALL.len());
    for indicator in Indicator::ALL {
        info!(indicator = %indicator, model = %indicator.spec().order, "Fitting ARIMA model");
        let evaluation = evaluate_indicator(&table, indicator, config);
        match &evaluation {
            Ok(eval) => {
                info!(
                    indicator = %indicator,
                    train = eval.split.train.len(),
                    test = eval.split.test.len(),
                    mae = eval.metrics.mae,
                    mape = eval.metrics.mape,
                    rmse = eval.metrics.rmse,
                    bias = eval.metrics.bias,
                    "Evaluated on held-out months"
                );
                sink.render(&evaluation_chart(indicator, &eval.split, &eval.forecast));
            }
            Err(e) => error!(indicator = %indicator, error = %e, "Evaluation failed"),
        }
        evaluations.push((indicator, evaluation));
    }

    info!(horizon = config.horizon, "Forecasting future months");
    let mut runs = Vec::with_capacity(evaluations.len());
    for (indicator, evaluation) in evaluations {
        let forecast = forecast_indicator(&table, indicator, config);
        match &forecast {
            Ok(future) => {
                if let Some(history) = table.column(indicator) {
                    sink.render(&production_chart(indicator, &history, future));
                }
            }
            Err(e) => error!(indicator = %indicator, error = %e, "Forecast failed"),
        }
        runs.push(IndicatorRun {
            indicator,
            evaluation,
            forecast,
        });
    }

    Ok(RunReport { table, runs })
}
