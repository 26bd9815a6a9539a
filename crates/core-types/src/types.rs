// In crates/core-types/src/types.rs

use crate::error::{Error, Result};
use chrono::{NaiveDate, TimeDelta};
use rust_decimal::Decimal;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ticker symbol as it appears in the configured universe (e.g., "RELIANCE").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

/// One trading day's observation.
///
/// `low <= open, close <= high` is expected but never checked here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Trailing simple moving average of `close`.
    /// `None` until enough history exists to compute it.
    pub moving_average: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            moving_average: None,
        }
    }

    pub fn with_moving_average(mut self, value: f64) -> Self {
        self.moving_average = Some(value);
        self
    }

    /// A day that closed above its open.
    pub fn is_up_day(&self) -> bool {
        self.close > self.open
    }
}

/// The daily history for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Wraps an already ordered list of points. An empty list is rejected so
    /// that every series has a latest close.
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptySeries(symbol.0));
        }
        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The close of the most recent point.
    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

/// The trailing calendar window a scan covers, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LookbackWindow {
    /// The window of `days` calendar days ending on `today`.
    pub fn ending_on(today: NaiveDate, days: i64) -> Result<Self> {
        if days < 1 {
            return Err(Error::InvalidLookback(days));
        }
        let start = TimeDelta::try_days(days)
            .and_then(|span| today.checked_sub_signed(span))
            .ok_or(Error::InvalidLookback(days))?;
        Ok(Self { start, end: today })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A single detected V20 opportunity. All prices and percentages are rounded
/// to two decimal places when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: Symbol,
    /// The first non-up day after the streak.
    pub signal_date: NaiveDate,
    pub buy_at: Decimal,
    pub sell_at: Decimal,
    pub percent_move: Decimal,
    pub latest_close: Decimal,
    pub proximity_percent: Decimal,
}

/// The outcome of a full scan.
///
/// `Empty` is a finished scan that found nothing; callers that cache results
/// use `Option<ResultSet>` for "not computed yet".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultSet {
    #[default]
    Empty,
    Signals(Vec<SignalRecord>),
}

impl ResultSet {
    pub fn from_records(records: Vec<SignalRecord>) -> Self {
        if records.is_empty() {
            ResultSet::Empty
        } else {
            ResultSet::Signals(records)
        }
    }

    pub fn records(&self) -> &[SignalRecord] {
        match self {
            ResultSet::Empty => &[],
            ResultSet::Signals(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<SignalRecord> {
        match self {
            ResultSet::Empty => Vec::new(),
            ResultSet::Signals(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultSet::Empty)
    }
}

// Serialized as a plain list so consumers never see the enum tag.
impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let records = self.records();
        let mut seq = serializer.serialize_seq(Some(records.len()))?;
        for record in records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
