// In crates/strategies/src/ranker.rs

use core_types::{ResultSet, SignalRecord};
use std::cmp::Ordering;

/// Orders signals for presentation: newest signal date first, then the
/// signals whose buy price sits closest to the latest close.
///
/// The sort is stable, so records that tie on both keys keep the order they
/// were aggregated in (the universe order).
pub fn rank(mut records: Vec<SignalRecord>) -> Vec<SignalRecord> {
    records.sort_by(compare);
    records
}

/// `rank` lifted over a `ResultSet`; an empty set stays empty.
pub fn rank_result_set(results: ResultSet) -> ResultSet {
    match results {
        ResultSet::Empty => ResultSet::Empty,
        ResultSet::Signals(records) => ResultSet::Signals(rank(records)),
    }
}

fn compare(a: &SignalRecord, b: &SignalRecord) -> Ordering {
    b.signal_date
        .cmp(&a.signal_date)
        .then_with(|| a.proximity_percent.cmp(&b.proximity_percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Symbol;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(symbol: &str, day: u32, proximity: Decimal) -> SignalRecord {
        SignalRecord {
            symbol: Symbol::from(symbol),
            signal_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            buy_at: dec!(100),
            sell_at: dec!(130),
            percent_move: dec!(30),
            latest_close: dec!(105),
            proximity_percent: proximity,
        }
    }

    fn symbols(records: &[SignalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.symbol.0.as_str()).collect()
    }

    #[test]
    fn newest_date_then_closest_proximity() {
        let input = vec![
            record("A", 2, dec!(5.0)),
            record("B", 2, dec!(1.0)),
            record("C", 1, dec!(0.5)),
        ];
        assert_eq!(symbols(&rank(input)), vec!["B", "A", "C"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let input = vec![
            record("ITC", 3, dec!(2.5)),
            record("RELIANCE", 3, dec!(2.5)),
            record("INFY", 3, dec!(2.5)),
            record("OLD", 1, dec!(2.5)),
        ];
        assert_eq!(
            symbols(&rank(input)),
            vec!["ITC", "RELIANCE", "INFY", "OLD"]
        );
    }

    #[test]
    fn ranking_does_not_modify_records() {
        let input = vec![record("A", 1, dec!(3)), record("B", 9, dec!(7))];
        let mut ranked = rank(input.clone());
        ranked.reverse();
        assert_eq!(ranked, input);
    }

    #[test]
    fn empty_result_set_stays_empty() {
        assert_eq!(rank_result_set(ResultSet::Empty), ResultSet::Empty);
        let ranked = rank_result_set(ResultSet::from_records(vec![
            record("A", 1, dec!(1)),
            record("B", 2, dec!(1)),
        ]));
        assert_eq!(symbols(ranked.records()), vec!["B", "A"]);
    }
}
