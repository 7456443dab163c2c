//! HTTP-backed series sources.

pub mod sgs;
pub mod yahoo;

use chrono::NaiveDate;
use macro_fcst_core::{ForecastError, RawSeries, Result, SeriesSource};
use std::time::Duration;
use tracing::{debug, info};

/// Per-request timeout applied by the agent.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("macro-fcst/", env!("CARGO_PKG_VERSION"));

/// Fetches market history from Yahoo Finance and macro history from the
/// Banco Central SGS API. One blocking request per call, no retries.
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }

    fn get(&self, url: &str) -> Result<ureq::Response> {
        debug!(url, "HTTP GET");
        self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => {
                ForecastError::SourceUnavailable(format!("{} returned HTTP {}", url, code))
            }
            ureq::Error::Transport(t) => {
                ForecastError::SourceUnavailable(format!("{}: {}", url, t))
            }
        })
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesSource for HttpSource {
    fn fetch_market_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries> {
        let url = yahoo::chart_url(symbol, start, end);
        let payload: serde_json::Value = self.get(&url)?.into_json().map_err(|e| {
            ForecastError::SourceFormat(format!("{}: response is not JSON: {}", symbol, e))
        })?;

        let series = yahoo::parse_chart(symbol, &payload)?;
        info!(symbol, rows = series.len(), "Downloaded market series");
        Ok(series)
    }

    fn fetch_macro_series(&self, code: u32) -> Result<RawSeries> {
        let url = sgs::series_url(code);
        let body = self.get(&url)?.into_string().map_err(|e| {
            ForecastError::SourceUnavailable(format!("sgs.{}: failed to read body: {}", code, e))
        })?;

        let series = sgs::parse_csv(code, &body)?;
        info!(code, rows = series.len(), "Downloaded macro series");
        Ok(series)
    }
}
