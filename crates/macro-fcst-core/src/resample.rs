//! Month-end resampling and calendar arithmetic.

use crate::error::{ForecastError, Result};
use crate::series::{MonthlySeries, Observation, RawSeries};
use chrono::{Datelike, Months, NaiveDate};

/// Months since year 0, used to compare calendar months.
pub fn month_key(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Get the first day of the month containing `date`.
fn start_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// Get the last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    start_of_month(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Month-end labels for the `count` months immediately after `last`.
///
/// `last` may be any day of its month; the first returned label is the end
/// of the following month.
pub fn following_month_ends(last: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let start = start_of_month(last).ok_or_else(|| out_of_range(last))?;

    (1..=count)
        .map(|step| {
            u32::try_from(step)
                .ok()
                .and_then(|step| start.checked_add_months(Months::new(step)))
                .and_then(month_end)
                .ok_or_else(|| out_of_range(last))
        })
        .collect()
}

fn out_of_range(date: NaiveDate) -> ForecastError {
    ForecastError::InvalidInput(format!("month arithmetic out of range from {}", date))
}

/// Resample to month-end frequency, keeping the last observation of each
/// calendar month.
///
/// The kept value is the last one reported in the month, which for macro
/// sources may be dated mid-month. It is labelled with the month's last day
/// either way.
pub fn to_month_end(series: &RawSeries) -> Result<MonthlySeries> {
    let mut months: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for obs in series.observations() {
        let label = month_end(obs.date).ok_or_else(|| out_of_range(obs.date))?;
        match months.last() {
            // Observations are date-ordered, so a repeated month overwrites.
            Some(prev) if *prev == label => {
                if let Some(last) = values.last_mut() {
                    *last = obs.value;
                }
            }
            _ => {
                months.push(label);
                values.push(obs.value);
            }
        }
    }

    MonthlySeries::new(series.name(), months, values)
}

/// Re-express a monthly series as raw observations on its month-end labels.
pub fn to_raw(series: &MonthlySeries) -> Result<RawSeries> {
    RawSeries::new(
        series.name(),
        series
            .iter()
            .map(|(date, value)| Observation::new(date, value))
            .collect(),
    )
}
