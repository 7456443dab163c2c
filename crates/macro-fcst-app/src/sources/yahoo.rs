//! Yahoo Finance chart API, daily bars.

use chrono::{DateTime, NaiveDate};
use macro_fcst_core::{ForecastError, Observation, RawSeries, Result};
use serde_json::Value;

/// Chart API URL for daily bars of `symbol` over `[start, end)`.
pub fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
        encode_symbol(symbol),
        unix_seconds(start),
        unix_seconds(end)
    )
}

fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Parse a chart API response into daily adjusted closes.
///
/// Timestamps are shifted by the exchange `gmtoffset` before taking the
/// calendar date. Bars with a null close are skipped. Without an
/// `adjclose` block the plain `close` quotes are used.
pub fn parse_chart(symbol: &str, payload: &Value) -> Result<RawSeries> {
    let chart = payload
        .get("chart")
        .ok_or_else(|| format_error(symbol, "missing 'chart' object"))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(format_error(symbol, &message));
    }

    let result = chart
        .get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| format_error(symbol, "missing 'chart.result[0]'"))?;

    let offset = result
        .get("meta")
        .and_then(|m| m.get("gmtoffset"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let timestamps = match result.get("timestamp") {
        Some(Value::Array(ts)) => ts.as_slice(),
        // No bars in the requested window
        None | Some(Value::Null) => &[],
        Some(_) => return Err(format_error(symbol, "'timestamp' is not an array")),
    };

    let indicators = result
        .get("indicators")
        .ok_or_else(|| format_error(symbol, "missing 'indicators'"))?;

    let closes = indicators
        .get("adjclose")
        .and_then(|a| a.get(0))
        .and_then(|a| a.get("adjclose"))
        .or_else(|| {
            indicators
                .get("quote")
                .and_then(|q| q.get(0))
                .and_then(|q| q.get("close"))
        })
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    if closes.len() != timestamps.len() {
        return Err(format_error(
            symbol,
            &format!(
                "{} timestamps but {} closes",
                timestamps.len(),
                closes.len()
            ),
        ));
    }

    let mut observations = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.iter().zip(closes.iter()) {
        if close.is_null() {
            continue;
        }
        let ts = ts
            .as_i64()
            .ok_or_else(|| format_error(symbol, &format!("bad timestamp {}", ts)))?;
        let value = close
            .as_f64()
            .ok_or_else(|| format_error(symbol, &format!("bad close {}", close)))?;
        let date = DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| format_error(symbol, &format!("timestamp {} out of range", ts)))?;

        observations.push(Observation::new(date, value));
    }

    RawSeries::new(symbol, observations)
}

fn format_error(symbol: &str, message: &str) -> ForecastError {
    ForecastError::SourceFormat(format!("{}: {}", symbol, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_chart_url() {
        let url = chart_url("^BVSP", date(2015, 1, 1), date(2024, 12, 31));
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/%5EBVSP?period1=1420070400&period2=1735603200&interval=1d&events=history&includeAdjustedClose=true"
        );
    }

    #[test]
    fn test_parse_adjclose_with_offset_and_nulls() {
        // Daily bars at 13:00 UTC from 2024-01-02, exchange at UTC-3
        let payload = json!({
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": -10800 },
                    "timestamp": [1704200400, 1704286800, 1704373200],
                    "indicators": {
                        "quote": [{ "close": [132697.0, 132834.0, 131226.0] }],
                        "adjclose": [{ "adjclose": [132697.0, null, 131226.0] }]
                    }
                }],
                "error": null
            }
        });

        let series = parse_chart("^BVSP", &payload).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(date(2024, 1, 2)));
        assert_eq!(series.last_date(), Some(date(2024, 1, 4)));
        assert_eq!(series.observations()[1].value, 131226.0);
    }

    #[test]
    fn test_falls_back_to_quote_close() {
        let payload = json!({
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": 0 },
                    "timestamp": [1704200400],
                    "indicators": { "quote": [{ "close": [100.5] }] }
                }],
                "error": null
            }
        });
        let series = parse_chart("^BVSP", &payload).unwrap();
        assert_eq!(series.observations()[0].value, 100.5);
    }

    #[test]
    fn test_chart_error_is_format_error() {
        let payload = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        match parse_chart("^XXXX", &payload) {
            Err(ForecastError::SourceFormat(message)) => assert!(message.contains("delisted")),
            other => panic!("expected SourceFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch_is_format_error() {
        let payload = json!({
            "chart": {
                "result": [{
                    "timestamp": [1704200400, 1704286800],
                    "indicators": { "adjclose": [{ "adjclose": [1.0] }] }
                }]
            }
        });
        assert!(matches!(
            parse_chart("^BVSP", &payload),
            Err(ForecastError::SourceFormat(_))
        ));
    }
}
