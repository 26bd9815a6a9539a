// In crates/strategies/src/v20.rs

use crate::error::{Error, Result};
use crate::types::V20Settings;
use crate::SignalScanner;
use core_types::{PricePoint, PriceSeries, SignalRecord, Symbol};
use rust_decimal::prelude::*;

/// The running range of the current run of up-days.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Streak {
    low: f64,
    high: f64,
}

impl Streak {
    fn start(point: &PricePoint) -> Self {
        Self {
            low: point.low,
            high: point.high,
        }
    }

    fn extend(&mut self, point: &PricePoint) {
        self.low = self.low.min(point.low);
        self.high = self.high.max(point.high);
    }

    fn percent_move(&self) -> f64 {
        (self.high - self.low) / self.low * 100.0
    }
}

/// Detects V20 setups: a run of up-days whose combined high-to-low range is at
/// least `threshold_percent`, confirmed on the first day that fails to close
/// above its open, with the streak low sitting under the moving average.
#[derive(Debug, Clone)]
pub struct V20Scanner {
    settings: V20Settings,
}

impl V20Scanner {
    /// Creates a new `V20Scanner` from its settings.
    pub fn new(settings: V20Settings) -> Result<Self> {
        let threshold = settings.threshold_percent;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &V20Settings {
        &self.settings
    }
}

impl SignalScanner for V20Scanner {
    fn name(&self) -> &'static str {
        "V20"
    }

    fn scan(&self, series: &PriceSeries) -> Vec<SignalRecord> {
        scan(series, self.settings.threshold_percent)
    }
}

/// Runs the streak detector over one symbol's series.
///
/// The first point only ever opens a streak context, it is never evaluated as
/// a breaking day. A streak still open when the series ends is dropped.
pub fn scan(series: &PriceSeries, threshold_percent: f64) -> Vec<SignalRecord> {
    let mut signals = Vec::new();
    let Some(latest_close) = series.latest_close() else {
        return signals;
    };

    let mut streak: Option<Streak> = None;

    for point in series.points().iter().skip(1) {
        if point.is_up_day() {
            match streak.as_mut() {
                Some(open) => open.extend(point),
                None => streak = Some(Streak::start(point)),
            }
            continue;
        }

        // Down or flat day: the run (if any) is over.
        if let Some(closed) = streak.take() {
            if let Some(signal) = evaluate(series.symbol(), &closed, point, latest_close, threshold_percent) {
                signals.push(signal);
            }
        }
    }

    tracing::debug!(
        symbol = %series.symbol(),
        points = series.len(),
        signals = signals.len(),
        "V20 scan finished."
    );

    signals
}

fn evaluate(
    symbol: &Symbol,
    streak: &Streak,
    breaking: &PricePoint,
    latest_close: f64,
    threshold_percent: f64,
) -> Option<SignalRecord> {
    let percent_move = streak.percent_move();
    // A non-positive low leaves the move undefined.
    if !percent_move.is_finite() {
        return None;
    }
    if percent_move < threshold_percent {
        return None;
    }
    // Without enough history for the average the filter does not apply.
    if let Some(average) = breaking.moving_average {
        if streak.low >= average {
            return None;
        }
    }

    let proximity = (latest_close - streak.low).abs() / streak.low * 100.0;

    Some(SignalRecord {
        symbol: symbol.clone(),
        signal_date: breaking.date,
        buy_at: round2(streak.low)?,
        sell_at: round2(streak.high)?,
        percent_move: round2(percent_move)?,
        latest_close: round2(latest_close)?,
        proximity_percent: round2(proximity)?,
    })
}

/// Rounds the exact binary value half-to-even to two decimal places.
/// `None` for NaN or infinite input.
fn round2(value: f64) -> Option<Decimal> {
    let mut rounded = Decimal::from_f64_retain(value)?.round_dp(2);
    rounded.rescale(2);
    Some(rounded)
}
