//! Chart descriptions handed to the presentation sink.
//!
//! The pipeline only describes what to draw. Rendering lives behind
//! [`ChartSink`] and nothing it does feeds back into the run.

use crate::forecast::ForecastSeries;
use crate::indicator::Indicator;
use crate::series::MonthlySeries;
use crate::split::Split;
use chrono::NaiveDate;

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One labelled line. `points[i]` belongs to `x_labels[i]` of its chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub style: LineStyle,
    pub points: Vec<Option<f64>>,
}

/// A titled chart over a shared month axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_labels: Vec<NaiveDate>,
    pub lines: Vec<ChartLine>,
}

/// Presentation sink for charts.
pub trait ChartSink {
    fn render(&mut self, chart: &Chart);
}

/// Sink that drops every chart.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ChartSink for NullSink {
    fn render(&mut self, _chart: &Chart) {}
}

/// Place `values` at `offset` on an axis of `axis_len` positions.
fn place(axis_len: usize, offset: usize, values: &[f64]) -> Vec<Option<f64>> {
    let mut points = vec![None; axis_len];
    for (slot, value) in points.iter_mut().skip(offset).zip(values.iter()) {
        *slot = Some(*value);
    }
    points
}

/// Train, test and test-period forecast on one axis.
pub fn evaluation_chart(indicator: Indicator, split: &Split, forecast: &ForecastSeries) -> Chart {
    let mut x_labels = split.train.months().to_vec();
    x_labels.extend_from_slice(split.test.months());
    let n = x_labels.len();
    let offset = split.train.len();

    Chart {
        title: format!("{} - Fit and Forecast (Test)", indicator),
        x_labels,
        lines: vec![
            ChartLine {
                label: "Train".to_string(),
                style: LineStyle::Solid,
                points: place(n, 0, split.train.values()),
            },
            ChartLine {
                label: "Test".to_string(),
                style: LineStyle::Solid,
                points: place(n, offset, split.test.values()),
            },
            ChartLine {
                label: "ARIMA Forecast".to_string(),
                style: LineStyle::Dashed,
                points: place(n, offset, &forecast.values),
            },
        ],
    }
}

/// Full history followed by the future forecast.
pub fn production_chart(
    indicator: Indicator,
    history: &MonthlySeries,
    forecast: &ForecastSeries,
) -> Chart {
    let mut x_labels = history.months().to_vec();
    x_labels.extend_from_slice(&forecast.months);
    let n = x_labels.len();

    Chart {
        title: format!("{} - Future Forecast", indicator),
        x_labels,
        lines: vec![
            ChartLine {
                label: "History".to_string(),
                style: LineStyle::Solid,
                points: place(n, 0, history.values()),
            },
            ChartLine {
                label: format!("ARIMA Forecast ({} months)", forecast.len()),
                style: LineStyle::Dashed,
                points: place(n, history.len(), &forecast.values),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::following_month_ends;

    fn monthly(start: NaiveDate, values: Vec<f64>) -> MonthlySeries {
        let months = following_month_ends(start, values.len()).unwrap();
        MonthlySeries::new("IBOV", months, values).unwrap()
    }

    #[test]
    fn test_place() {
        assert_eq!(
            place(4, 1, &[7.0, 8.0]),
            vec![None, Some(7.0), Some(8.0), None]
        );
        // Values past the axis are dropped
        assert_eq!(place(2, 1, &[7.0, 8.0]), vec![None, Some(7.0)]);
    }

    #[test]
    fn test_evaluation_chart_layout() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let series = monthly(start, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let split = Split {
            train: series.slice(0..4),
            test: series.slice(4..5),
        };
        let forecast = ForecastSeries {
            months: split.test.months().to_vec(),
            values: vec![4.5],
            model_name: "ARIMA(1,1,1)".to_string(),
            diagnostics: None,
        };

        let chart = evaluation_chart(Indicator::StockIndex, &split, &forecast);
        assert_eq!(chart.title, "IBOV - Fit and Forecast (Test)");
        assert_eq!(chart.x_labels, series.months());
        assert_eq!(chart.lines.len(), 3);
        assert_eq!(chart.lines[1].points, vec![None, None, None, None, Some(5.0)]);
        assert_eq!(chart.lines[2].points[4], Some(4.5));
        assert_eq!(chart.lines[2].style, LineStyle::Dashed);
    }

    #[test]
    fn test_production_chart_extends_axis() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let history = monthly(start, vec![1.0, 2.0]);
        let forecast = ForecastSeries {
            months: following_month_ends(history.last_month().unwrap(), 3).unwrap(),
            values: vec![2.1, 2.2, 2.3],
            model_name: "ARIMA(1,0,1)".to_string(),
            diagnostics: None,
        };

        let chart = production_chart(Indicator::ShortRate, &history, &forecast);
        assert_eq!(chart.title, "CDI - Future Forecast");
        assert_eq!(chart.x_labels.len(), 5);
        assert_eq!(chart.lines[1].label, "ARIMA Forecast (3 months)");
        assert_eq!(chart.lines[0].points[2], None);
        assert_eq!(chart.lines[1].points[2], Some(2.1));
    }
}
