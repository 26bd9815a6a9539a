// In crates/market-data/src/indicators.rs

use crate::error::{Error, Result};
use core_types::PricePoint;
use ta::indicators::SimpleMovingAverage as Sma;
use ta::Next;

/// The trailing window used for the trend filter.
pub const DEFAULT_MOVING_AVERAGE_PERIOD: usize = 200;

/// Fills `moving_average` on every point with the simple moving average of
/// the last `period` closes. Points without a full window keep `None`.
pub fn attach_moving_average(points: &mut [PricePoint], period: usize) -> Result<()> {
    let mut sma = Sma::new(period).map_err(|_| Error::InvalidPeriod)?;

    for (i, point) in points.iter_mut().enumerate() {
        let value = sma.next(point.close);
        point.moving_average = if i + 1 >= period { Some(value) } else { None };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c, c, c, c))
            .collect()
    }

    #[test]
    fn average_is_absent_until_window_is_full() {
        let mut pts = points(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        attach_moving_average(&mut pts, 3).unwrap();

        let averages: Vec<Option<f64>> = pts.iter().map(|p| p.moving_average).collect();
        assert_eq!(averages[0], None);
        assert_eq!(averages[1], None);
        assert!((averages[2].unwrap() - 2.0).abs() < 1e-9);
        assert!((averages[3].unwrap() - 3.0).abs() < 1e-9);
        assert!((averages[4].unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn default_period_leaves_first_199_points_empty() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let mut pts = points(&closes);
        attach_moving_average(&mut pts, DEFAULT_MOVING_AVERAGE_PERIOD).unwrap();

        assert!(pts[..199].iter().all(|p| p.moving_average.is_none()));
        assert!(pts[199..].iter().all(|p| p.moving_average.is_some()));
        // Mean of 100..=299 is 199.5.
        assert!((pts[199].moving_average.unwrap() - 199.5).abs() < 1e-6);
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut pts = points(&[1.0]);
        assert!(matches!(attach_moving_average(&mut pts, 0), Err(Error::InvalidPeriod)));
    }
}
