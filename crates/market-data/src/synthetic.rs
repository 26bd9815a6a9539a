// In crates/market-data/src/synthetic.rs

use crate::error::Result;
use crate::indicators::attach_moving_average;
use crate::PriceProvider;
use async_trait::async_trait;
use chrono::Duration;
use core_types::{LookbackWindow, PricePoint, PriceSeries, Symbol};

/// An offline stand-in for a market data vendor.
///
/// Every calendar day in the window gets a bar built from a deterministic
/// staircase: the base price starts at 100 and climbs by `i % 10` on day `i`.
/// Each bar opens at 98% of the base, trades between 97% and 102%, and closes
/// on the base. The same series is produced for every symbol.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    moving_average_period: usize,
}

impl SyntheticProvider {
    pub fn new(moving_average_period: usize) -> Self {
        Self {
            moving_average_period,
        }
    }
}

/// Base prices for `days` consecutive days.
fn staircase(days: usize) -> impl Iterator<Item = f64> {
    (0..days).scan(100.0, |price, i| {
        *price += (i % 10) as f64;
        Some(*price)
    })
}

#[async_trait]
impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch(&self, symbol: &Symbol, window: &LookbackWindow) -> Result<PriceSeries> {
        let days = (window.end - window.start).num_days() + 1;
        let days = usize::try_from(days).unwrap_or(0);

        let mut points: Vec<PricePoint> = staircase(days)
            .enumerate()
            .map(|(i, price)| {
                PricePoint::new(
                    window.start + Duration::days(i as i64),
                    price * 0.98,
                    price * 1.02,
                    price * 0.97,
                    price,
                )
            })
            .collect();

        attach_moving_average(&mut points, self.moving_average_period)?;
        tracing::debug!(symbol = %symbol, points = points.len(), "Generated synthetic series.");

        Ok(PriceSeries::new(symbol.clone(), points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(days: i64) -> LookbackWindow {
        LookbackWindow::ending_on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), days).unwrap()
    }

    #[test]
    fn staircase_matches_cumulative_steps() {
        let prices: Vec<f64> = staircase(12).collect();
        assert_eq!(prices[..4], [100.0, 101.0, 103.0, 106.0]);
        // Day 10 wraps back to a step of zero.
        assert_eq!(prices[9], 145.0);
        assert_eq!(prices[10], 145.0);
        assert_eq!(prices[11], 146.0);
    }

    #[tokio::test]
    async fn covers_every_day_of_the_window() {
        let provider = SyntheticProvider::new(200);
        let window = window(1095);
        let series = provider.fetch(&Symbol::from("ITC"), &window).await.unwrap();

        assert_eq!(series.len(), 1096);
        assert_eq!(series.points().first().unwrap().date, window.start);
        assert_eq!(series.points().last().unwrap().date, window.end);
        assert!(series.points()[198].moving_average.is_none());
        assert!(series.points()[199].moving_average.is_some());

        let bar = series.points()[3];
        assert!((bar.open - 106.0 * 0.98).abs() < 1e-9);
        assert!((bar.high - 106.0 * 1.02).abs() < 1e-9);
        assert!((bar.low - 106.0 * 0.97).abs() < 1e-9);
        assert_eq!(bar.close, 106.0);
    }

    #[tokio::test]
    async fn series_is_the_same_for_every_symbol() {
        let provider = SyntheticProvider::new(20);
        let a = provider.fetch(&Symbol::from("INFY"), &window(60)).await.unwrap();
        let b = provider.fetch(&Symbol::from("ITC"), &window(60)).await.unwrap();
        assert_eq!(a.points(), b.points());
        assert_eq!(b.symbol(), &Symbol::from("ITC"));
    }
}
