//! Banco Central SGS time series, CSV flavour.
//!
//! The payload is semicolon-delimited with a `data;valor` header, day-first
//! dates and comma decimals:
//!
//! ```text
//! "data";"valor"
//! "02/01/2015";"0,045513"
//! ```

use chrono::NaiveDate;
use macro_fcst_core::{ForecastError, Observation, RawSeries, Result};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// URL serving the full history of series `code` as CSV.
pub fn series_url(code: u32) -> String {
    format!(
        "https://api.bcb.gov.br/dados/serie/bcdata.sgs.{}/dados?formato=csv",
        code
    )
}

/// Parse a decimal written with a comma separator (`"0,05"`).
pub fn parse_decimal(field: &str) -> Result<f64> {
    let normalized = field.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ForecastError::SourceFormat(format!("bad decimal value '{}'", field)))
}

/// Parse a CSV body into a raw series named `sgs.{code}`.
///
/// Rows with an empty value are skipped; every other malformed row fails
/// the whole payload.
pub fn parse_csv(code: u32, body: &str) -> Result<RawSeries> {
    let name = format!("sgs.{}", code);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ForecastError::SourceFormat(format!("{}: failed to read header: {}", name, e)))?
        .clone();

    let date_col = column(&headers, "data", &name)?;
    let value_col = column(&headers, "valor", &name)?;

    let mut observations = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| ForecastError::SourceFormat(format!("{}: row {}: {}", name, line + 1, e)))?;

        let value_field = record.get(value_col).unwrap_or("");
        if value_field.is_empty() {
            continue;
        }

        let date_field = record.get(date_col).unwrap_or("");
        let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT).map_err(|_| {
            ForecastError::SourceFormat(format!(
                "{}: row {}: bad date '{}'",
                name,
                line + 1,
                date_field
            ))
        })?;

        let value = parse_decimal(value_field)
            .map_err(|e| ForecastError::SourceFormat(format!("{}: row {}: {}", name, line + 1, e)))?;

        observations.push(Observation::new(date, value));
    }

    RawSeries::new(name, observations)
}

fn column(headers: &csv::StringRecord, wanted: &str, name: &str) -> Result<usize> {
    headers.iter().position(|h| h == wanted).ok_or_else(|| {
        ForecastError::SourceFormat(format!(
            "{}: missing '{}' column in header {:?}",
            name,
            wanted,
            headers.iter().collect::<Vec<_>>()
        ))
    })
}
