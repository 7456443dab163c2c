//! Console summary of a finished run.

use macro_fcst_core::{AccuracyMetrics, Indicator, RunReport};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// `"{name}: MAE = {mae:.6} | MAPE = {mape:.2}%"`.
pub fn summary_line(indicator: Indicator, metrics: &AccuracyMetrics) -> String {
    format!(
        "{}: MAE = {:.6} | MAPE = {:.2}%",
        indicator, metrics.mae, metrics.mape
    )
}

/// Future forecasts as a table: one row per month, one column per
/// indicator that produced a forecast.
pub fn forecast_table(report: &RunReport) -> Vec<String> {
    let forecasts: Vec<_> = report.forecasts().collect();
    if forecasts.is_empty() {
        return Vec::new();
    }

    let mut rows: BTreeMap<_, Vec<Option<f64>>> = BTreeMap::new();
    for (column, (_, forecast)) in forecasts.iter().enumerate() {
        for (month, value) in forecast.months.iter().zip(forecast.values.iter()) {
            let row = rows
                .entry(*month)
                .or_insert_with(|| vec![None; forecasts.len()]);
            row[column] = Some(*value);
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header: String = forecasts
        .iter()
        .map(|(indicator, _)| format!("{:>14}", indicator.name()))
        .collect();
    lines.push(format!("{:<10}{}", "month", header));

    for (month, values) in rows {
        let cells: String = values
            .iter()
            .map(|v| match v {
                Some(v) => format!("{:>14.6}", v),
                None => format!("{:>14}", "-"),
            })
            .collect();
        lines.push(format!("{:<10}{}", month.format("%Y-%m-%d"), cells));
    }
    lines
}

/// Write the accuracy summary, failures and forecast table.
pub fn write_report<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(out, "Forecast accuracy (test set):")?;
    for (indicator, metrics) in report.metrics() {
        writeln!(out, "{}", summary_line(indicator, &metrics))?;
        writeln!(
            out,
            "    RMSE = {:.6} | Bias = {:.6}",
            metrics.rmse, metrics.bias
        )?;
    }
    for (indicator, error) in report.failures() {
        writeln!(out, "{}: failed: {}", indicator, error)?;
    }

    let table = forecast_table(report);
    if !table.is_empty() {
        writeln!(out)?;
        writeln!(out, "Forecasts:")?;
        for line in table {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_format() {
        let metrics = AccuracyMetrics {
            mae: 0.0012345678,
            mape: 12.3456,
            rmse: 0.002,
            bias: 0.0,
        };
        assert_eq!(
            summary_line(Indicator::ShortRate, &metrics),
            "CDI: MAE = 0.001235 | MAPE = 12.35%"
        );
    }
}
