//! Bar cleaning: drop incomplete rows, sort, dedupe.

use super::provider::RawBar;
use crate::domain::{Bar, Series};

/// A cleaned series plus bookkeeping about what was discarded.
#[derive(Debug, Clone, Default)]
pub struct CleanedSeries {
    pub bars: Series,
    /// Rows missing a required field or carrying a price that is not finite and positive.
    pub incomplete: usize,
    /// Rows sharing a date with an earlier row.
    pub duplicates: usize,
}

/// Convert raw provider rows into a detector-ready series.
///
/// Rows missing any of the five OHLCV fields, or with a price that is not
/// a finite positive number, are dropped outright. The survivors are sorted
/// ascending by date and only the first row for each date is kept.
pub fn clean_bars(raw: Vec<RawBar>) -> CleanedSeries {
    let total = raw.len();
    let mut bars: Vec<Bar> = raw.into_iter().filter_map(complete).collect();
    let incomplete = total - bars.len();

    // stable sort keeps provider order among equal dates
    bars.sort_by_key(|b| b.date);
    let before = bars.len();
    bars.dedup_by_key(|b| b.date);

    CleanedSeries {
        duplicates: before - bars.len(),
        incomplete,
        bars,
    }
}

fn complete(raw: RawBar) -> Option<Bar> {
    let bar = Bar {
        date: raw.date,
        open: raw.open?,
        high: raw.high?,
        low: raw.low?,
        close: raw.close?,
        volume: raw.volume?,
    };
    bar.has_valid_prices().then_some(bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(day: u32, close: Option<f64>) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: Some(100.0),
            high: Some(102.0),
            low: Some(99.0),
            close,
            volume: Some(1_000),
        }
    }

    #[test]
    fn drops_rows_missing_a_field() {
        let mut missing_volume = raw(3, Some(101.0));
        missing_volume.volume = None;
        let cleaned = clean_bars(vec![raw(1, Some(101.0)), raw(2, None), missing_volume]);
        assert_eq!(cleaned.bars.len(), 1);
        assert_eq!(cleaned.incomplete, 2);
    }

    #[test]
    fn drops_non_finite_prices() {
        let cleaned = clean_bars(vec![raw(1, Some(f64::NAN)), raw(2, Some(101.0))]);
        assert_eq!(cleaned.bars.len(), 1);
        assert_eq!(cleaned.incomplete, 1);
    }

    #[test]
    fn drops_zero_and_negative_prices() {
        let mut zero_low = raw(1, Some(101.0));
        zero_low.low = Some(0.0);
        let mut negative_open = raw(2, Some(101.0));
        negative_open.open = Some(-5.0);
        let zero_close = raw(3, Some(0.0));
        let cleaned = clean_bars(vec![zero_low, negative_open, zero_close, raw(4, Some(101.0))]);
        assert_eq!(cleaned.bars.len(), 1);
        assert_eq!(cleaned.incomplete, 3);
        assert_eq!(cleaned.bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn zero_volume_is_kept() {
        let mut quiet = raw(1, Some(101.0));
        quiet.volume = Some(0);
        assert_eq!(clean_bars(vec![quiet]).bars.len(), 1);
    }

    #[test]
    fn sorts_ascending_by_date() {
        let cleaned = clean_bars(vec![raw(3, Some(1.0)), raw(1, Some(2.0)), raw(2, Some(3.0))]);
        let days: Vec<_> = cleaned.bars.iter().map(|b| b.date).collect();
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn keeps_first_row_for_duplicate_dates() {
        let cleaned = clean_bars(vec![
            raw(1, Some(101.0)),
            raw(1, Some(105.0)),
            raw(2, Some(103.0)),
        ]);
        assert_eq!(cleaned.bars.len(), 2);
        assert_eq!(cleaned.duplicates, 1);
        assert_eq!(cleaned.bars[0].close, 101.0);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let cleaned = clean_bars(Vec::new());
        assert!(cleaned.bars.is_empty());
        assert_eq!(cleaned.incomplete, 0);
    }
}
