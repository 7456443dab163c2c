//! The fixed set of forecast indicators and their modelling policy.
//!
//! Each indicator carries its source, unit scaling, transform and ARIMA
//! order as data in [`SPECS`]. Adding an indicator is one enum variant and
//! one table row.

use crate::forecast::{ArimaOrder, Transform};
use std::fmt;

/// Forecast indicators, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    /// Ibovespa stock index.
    StockIndex,
    /// CDI interbank rate.
    ShortRate,
    /// IPCA consumer inflation.
    Inflation,
}

/// Where an indicator's raw history comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSpec {
    /// Daily adjusted closes by ticker symbol.
    Market { symbol: &'static str },
    /// Central bank time series by numeric code.
    Macro { code: u32 },
}

/// Modelling policy for one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSpec {
    pub indicator: Indicator,
    /// Column name in the aligned table and in reports.
    pub name: &'static str,
    pub source: SourceSpec,
    /// Factor applied after monthly resampling (percent to fraction).
    pub scale: f64,
    pub transform: Transform,
    pub order: ArimaOrder,
}

/// Policy table, one row per indicator in [`Indicator::ALL`] order.
pub const SPECS: [IndicatorSpec; 3] = [
    IndicatorSpec {
        indicator: Indicator::StockIndex,
        name: "IBOV",
        source: SourceSpec::Market { symbol: "^BVSP" },
        scale: 1.0,
        transform: Transform::Log,
        order: ArimaOrder::new(1, 1, 1),
    },
    IndicatorSpec {
        indicator: Indicator::ShortRate,
        name: "CDI",
        source: SourceSpec::Macro { code: 12 },
        scale: 0.01,
        transform: Transform::Identity,
        order: ArimaOrder::new(1, 0, 1),
    },
    IndicatorSpec {
        indicator: Indicator::Inflation,
        name: "IPCA",
        source: SourceSpec::Macro { code: 433 },
        scale: 0.01,
        transform: Transform::Identity,
        order: ArimaOrder::new(1, 0, 1),
    },
];

impl Indicator {
    pub const ALL: [Indicator; 3] = [
        Indicator::StockIndex,
        Indicator::ShortRate,
        Indicator::Inflation,
    ];

    /// Modelling policy for this indicator.
    pub fn spec(&self) -> &'static IndicatorSpec {
        match self {
            Indicator::StockIndex => &SPECS[0],
            Indicator::ShortRate => &SPECS[1],
            Indicator::Inflation => &SPECS[2],
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_table_matches_variants() {
        for indicator in Indicator::ALL {
            assert_eq!(indicator.spec().indicator, indicator);
        }
    }

    #[test]
    fn test_stock_index_policy() {
        let spec = Indicator::StockIndex.spec();
        assert_eq!(spec.name, "IBOV");
        assert_eq!(spec.transform, Transform::Log);
        assert_eq!(spec.order, ArimaOrder::new(1, 1, 1));
        assert_eq!(spec.source, SourceSpec::Market { symbol: "^BVSP" });
    }

    #[test]
    fn test_macro_policies() {
        assert_eq!(
            Indicator::ShortRate.spec().source,
            SourceSpec::Macro { code: 12 }
        );
        assert_eq!(
            Indicator::Inflation.spec().source,
            SourceSpec::Macro { code: 433 }
        );
        for indicator in [Indicator::ShortRate, Indicator::Inflation] {
            let spec = indicator.spec();
            assert_eq!(spec.transform, Transform::Identity);
            assert_eq!(spec.order, ArimaOrder::new(1, 0, 1));
            assert_eq!(spec.scale, 0.01);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Indicator::Inflation.to_string(), "IPCA");
    }
}
