// In crates/market-data/src/yahoo.rs

use crate::error::{Error, Result};
use crate::indicators::attach_moving_average;
use crate::types::{ChartResponse, ChartResult};
use crate::PriceProvider;
use app_config::types::MarketDataSettings;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate};
use core_types::{LookbackWindow, PricePoint, PriceSeries, Symbol};
use reqwest::Client;
use serde_json::Value;

/// Daily bars from a Yahoo-Finance-compatible `v8/finance/chart` endpoint.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    /// The persistent HTTP client.
    http_client: Client,
    /// The base URL of the chart API, without a trailing slash.
    base_url: String,
    /// Exchange suffix appended to every symbol (e.g., ".NS").
    symbol_suffix: String,
    moving_average_period: usize,
}

impl YahooProvider {
    /// Constructs a new provider from the market data settings.
    pub fn new(settings: &MarketDataSettings) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("v20-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            symbol_suffix: settings.symbol_suffix.clone(),
            moving_average_period: settings.moving_average_period,
        })
    }

    fn chart_url(&self, symbol: &Symbol, window: &LookbackWindow) -> String {
        let period1 = midnight_utc(window.start);
        // period2 is exclusive, so step past the last day.
        let period2 = midnight_utc(window.end + Duration::days(1));
        format!(
            "{}/v8/finance/chart/{}{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol.0, self.symbol_suffix, period1, period2
        )
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(&self, symbol: &Symbol, window: &LookbackWindow) -> Result<PriceSeries> {
        let url = self.chart_url(symbol, window);
        tracing::debug!(%symbol, %url, "Requesting daily bars.");

        let response_body = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        let response: ChartResponse = serde_json::from_str(&response_body).map_err(|e| {
            // A body that is not a chart may still be a bare error object.
            if let Ok(value) = serde_json::from_str::<Value>(&response_body) {
                if let Some(msg) = value.get("error").and_then(Value::as_str) {
                    return Error::ApiError {
                        code: "unknown".to_string(),
                        msg: msg.to_string(),
                    };
                }
            }
            Error::DeserializationFailed(e)
        })?;

        if let Some(err) = response.chart.error {
            return Err(Error::ApiError {
                code: err.code,
                msg: err.description,
            });
        }

        let result = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::NoData(symbol.0.clone()))?;

        let mut points = bars_from_chart(result, window);
        if points.is_empty() {
            return Err(Error::NoData(symbol.0.clone()));
        }

        attach_moving_average(&mut points, self.moving_average_period)?;
        tracing::debug!(%symbol, points = points.len(), "Received daily bars.");

        Ok(PriceSeries::new(symbol.clone(), points)?)
    }
}

/// Turns the column-oriented chart payload into ascending, de-duplicated
/// points. Rows with any missing price are skipped; for repeated dates the
/// later row wins.
fn bars_from_chart(result: ChartResult, window: &LookbackWindow) -> Vec<PricePoint> {
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let mut points: Vec<PricePoint> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            let open = (*quote.open.get(i)?)?;
            let high = (*quote.high.get(i)?)?;
            let low = (*quote.low.get(i)?)?;
            let close = (*quote.close.get(i)?)?;
            Some(PricePoint::new(date, open, high, low, close))
        })
        .filter(|p| window.contains(p.date))
        .collect();

    points.sort_by_key(|p| p.date);

    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => deduped.push(point),
        }
    }
    deduped
}
