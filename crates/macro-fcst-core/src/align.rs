//! Inner-join of monthly series into one aligned table.

use crate::error::{ForecastError, Result};
use crate::indicator::Indicator;
use crate::resample::month_key;
use crate::series::MonthlySeries;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

/// Monthly columns sharing one month index, no missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    months: Vec<NaiveDate>,
    columns: Vec<(Indicator, Vec<f64>)>,
}

impl AlignedTable {
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Indicators present, in column order.
    pub fn indicators(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.columns.iter().map(|(indicator, _)| *indicator)
    }

    /// One column as a monthly series named after the indicator.
    pub fn column(&self, indicator: Indicator) -> Option<MonthlySeries> {
        self.columns
            .iter()
            .find(|(i, _)| *i == indicator)
            .and_then(|(_, values)| {
                MonthlySeries::new(indicator.name(), self.months.clone(), values.clone()).ok()
            })
    }

    /// Like [`column`](Self::column), failing when the indicator is absent.
    pub fn require_column(&self, indicator: Indicator) -> Result<MonthlySeries> {
        self.column(indicator).ok_or_else(|| {
            ForecastError::InvalidInput(format!("aligned table has no {} column", indicator))
        })
    }
}

/// Join monthly series on calendar month, keeping only months present in
/// every input.
///
/// An empty result is an error: nothing downstream can be fitted on it.
pub fn align(inputs: &[(Indicator, MonthlySeries)]) -> Result<AlignedTable> {
    if inputs.is_empty() {
        return Err(ForecastError::InvalidInput(
            "nothing to align: no input series".to_string(),
        ));
    }

    let mut common: BTreeSet<i32> = inputs[0].1.months().iter().map(|m| month_key(*m)).collect();
    for (_, series) in &inputs[1..] {
        let keys: BTreeSet<i32> = series.months().iter().map(|m| month_key(*m)).collect();
        common = common.intersection(&keys).copied().collect();
    }

    if common.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    let mut months = Vec::with_capacity(common.len());
    let mut columns = Vec::with_capacity(inputs.len());

    for (position, (indicator, series)) in inputs.iter().enumerate() {
        let kept: Vec<(NaiveDate, f64)> = series
            .iter()
            .filter(|(month, _)| common.contains(&month_key(*month)))
            .collect();

        debug!(
            indicator = %indicator,
            input_months = series.len(),
            dropped = series.len() - kept.len(),
            "Aligned monthly series"
        );

        if position == 0 {
            months = kept.iter().map(|(month, _)| *month).collect();
        }
        columns.push((*indicator, kept.into_iter().map(|(_, v)| v).collect()));
    }

    Ok(AlignedTable { months, columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(name: &str, points: &[((i32, u32, u32), f64)]) -> MonthlySeries {
        MonthlySeries::new(
            name,
            points.iter().map(|((y, m, d), _)| date(*y, *m, *d)).collect(),
            points.iter().map(|(_, v)| *v).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_align_inner_join() {
        let ibov = monthly(
            "IBOV",
            &[
                ((2024, 1, 31), 127.0),
                ((2024, 2, 29), 129.0),
                ((2024, 3, 31), 128.0),
                ((2024, 4, 30), 125.0),
            ],
        );
        let cdi = monthly(
            "CDI",
            &[((2024, 2, 29), 0.04), ((2024, 3, 31), 0.04), ((2024, 4, 30), 0.04)],
        );
        let ipca = monthly(
            "IPCA",
            &[((2024, 1, 31), 0.0042), ((2024, 2, 29), 0.0083), ((2024, 3, 31), 0.0016)],
        );

        let table = align(&[
            (Indicator::StockIndex, ibov.clone()),
            (Indicator::ShortRate, cdi.clone()),
            (Indicator::Inflation, ipca.clone()),
        ])
        .unwrap();

        assert_eq!(table.months(), &[date(2024, 2, 29), date(2024, 3, 31)]);
        assert_eq!(
            table.column(Indicator::StockIndex).unwrap().values(),
            &[129.0, 128.0]
        );
        assert_eq!(
            table.column(Indicator::Inflation).unwrap().values(),
            &[0.0083, 0.0016]
        );

        // Every output month exists in every input.
        for month in table.months() {
            for series in [&ibov, &cdi, &ipca] {
                assert!(series.months().contains(month));
            }
        }
        for indicator in table.indicators() {
            assert_eq!(table.column(indicator).unwrap().len(), table.len());
        }
    }

    #[test]
    fn test_align_disjoint_is_insufficient() {
        let a = monthly("IBOV", &[((2024, 1, 31), 1.0)]);
        let b = monthly("CDI", &[((2024, 2, 29), 1.0)]);
        let result = align(&[(Indicator::StockIndex, a), (Indicator::ShortRate, b)]);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { needed: 1, got: 0 })
        ));
    }

    #[test]
    fn test_missing_column() {
        let a = monthly("IBOV", &[((2024, 1, 31), 1.0)]);
        let table = align(&[(Indicator::StockIndex, a)]).unwrap();
        assert!(table.column(Indicator::ShortRate).is_none());
        assert!(table.require_column(Indicator::ShortRate).is_err());
    }
}
