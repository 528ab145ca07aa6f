//! Markup detector — accumulation-range breakout with volume and trend confirmation.
//!
//! A symbol is flagged when, over its trailing accumulation window:
//! - the last close clears the window's highest high by `breakout_threshold`;
//! - the last volume clears the window's mean volume by `volume_multiplier`;
//! - the trailing trend window shows higher highs or higher lows.
//!
//! The recent window includes the latest bar, so the breakout compares the
//! last close against that bar's own high as well.
//!
//! Classification never fails. Short or malformed series are "not flagged",
//! with the reason carried in the [`Verdict`].

use crate::config::{DetectorConfig, Monotonicity};
use crate::domain::Bar;
use tracing::debug;

/// Intermediate values behind a classification.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSignals {
    /// Highest high over the accumulation window.
    pub acc_high: f64,
    /// Mean volume over the accumulation window.
    pub avg_volume: f64,
    pub last_close: f64,
    pub last_volume: u64,
    pub breakout: bool,
    pub volume_breakout: bool,
    /// `None` when the trend window held fewer than two bars.
    pub higher_highs: Option<bool>,
    pub higher_lows: Option<bool>,
}

impl MarkupSignals {
    pub fn trend_checked(&self) -> bool {
        self.higher_highs.is_some()
    }

    fn is_markup(&self) -> bool {
        let trend = match (self.higher_highs, self.higher_lows) {
            (Some(hh), Some(hl)) => hh || hl,
            _ => true,
        };
        self.breakout && self.volume_breakout && trend
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Fewer bars than the accumulation window.
    InsufficientHistory { have: usize, need: usize },
    /// Non-finite values in the examined windows.
    Malformed { reason: String },
    Evaluated(MarkupSignals),
}

/// Always-defined outcome of running the detector on one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub flagged: bool,
    pub verdict: Verdict,
}

impl Classification {
    fn not_flagged(verdict: Verdict) -> Self {
        Self {
            flagged: false,
            verdict,
        }
    }

    pub fn signals(&self) -> Option<&MarkupSignals> {
        match &self.verdict {
            Verdict::Evaluated(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkupDetector {
    config: DetectorConfig,
}

impl MarkupDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Classify a series ordered ascending by date.
    pub fn classify(&self, bars: &[Bar]) -> Classification {
        let window = self.config.accumulation_window.max(1);
        if bars.len() < window {
            return Classification::not_flagged(Verdict::InsufficientHistory {
                have: bars.len(),
                need: window,
            });
        }

        let trend_len = self.config.trend_window.min(bars.len());
        let examined = &bars[bars.len() - window.max(trend_len)..];
        if let Some(bad) = examined.iter().find(|b| !b.is_finite()) {
            let reason = format!("non-finite price on {}", bad.date);
            debug!(%reason, "markup detector rejected series");
            return Classification::not_flagged(Verdict::Malformed { reason });
        }

        // len >= window >= 1, so both windows are non-empty
        let recent = &bars[bars.len() - window..];
        let last = &recent[recent.len() - 1];

        let acc_high = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let avg_volume = recent.iter().map(|b| b.volume as f64).sum::<f64>() / recent.len() as f64;

        let breakout = last.close > acc_high * (1.0 + self.config.breakout_threshold);
        let volume_breakout = last.volume as f64 > avg_volume * self.config.volume_multiplier;

        let trend = &bars[bars.len() - trend_len..];
        let (higher_highs, higher_lows) = if trend.len() < 2 {
            (None, None)
        } else {
            let mode = self.config.monotonicity;
            (
                Some(rising(trend, mode, |b| b.high)),
                Some(rising(trend, mode, |b| b.low)),
            )
        };

        let signals = MarkupSignals {
            acc_high,
            avg_volume,
            last_close: last.close,
            last_volume: last.volume,
            breakout,
            volume_breakout,
            higher_highs,
            higher_lows,
        };

        Classification {
            flagged: signals.is_markup(),
            verdict: Verdict::Evaluated(signals),
        }
    }

    pub fn detect(&self, bars: &[Bar]) -> bool {
        self.classify(bars).flagged
    }
}

/// Convenience wrapper: classify with the given config and return the flag.
pub fn detect_markup(bars: &[Bar], config: &DetectorConfig) -> bool {
    MarkupDetector::new(config.clone()).detect(bars)
}

fn rising(bars: &[Bar], mode: Monotonicity, field: impl Fn(&Bar) -> f64) -> bool {
    bars.windows(2).all(|w| mode.holds(field(&w[0]), field(&w[1])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: usize, high: f64, low: f64, close: f64, volume: u64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    /// Flat base at 100 with volume 1000, then a final bar supplied by the caller.
    fn base_with_last(n: usize, last: Bar) -> Vec<Bar> {
        let mut bars: Vec<Bar> = (0..n - 1).map(|i| bar(i, 100.0, 90.0, 95.0, 1_000)).collect();
        bars.push(last);
        bars
    }

    fn small_config() -> DetectorConfig {
        DetectorConfig {
            accumulation_window: 5,
            trend_window: 3,
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn short_series_is_insufficient_history() {
        let det = MarkupDetector::new(small_config());
        let bars = base_with_last(4, bar(3, 100.0, 90.0, 200.0, 100_000));
        let c = det.classify(&bars);
        assert!(!c.flagged);
        assert_eq!(c.verdict, Verdict::InsufficientHistory { have: 4, need: 5 });
    }

    #[test]
    fn empty_series_is_not_flagged() {
        let det = MarkupDetector::default();
        assert!(!det.detect(&[]));
    }

    #[test]
    fn series_of_exactly_one_window_is_evaluated() {
        let det = MarkupDetector::new(DetectorConfig {
            accumulation_window: 1,
            ..small_config()
        });
        let c = det.classify(&[bar(0, 100.0, 90.0, 106.0, 10_000)]);
        let s = c.signals().unwrap();
        assert_eq!(s.acc_high, 100.0);
        assert_eq!(s.last_close, 106.0);
        assert!(s.breakout);
        // the single bar is its own average, so volume never clears 1.5x
        assert!(!s.volume_breakout);
        assert!(!s.trend_checked());
        assert!(!c.flagged);
    }

    #[test]
    fn flat_run_counts_as_rising_when_non_strict() {
        // trend window is flat highs at 100; close 106 clears 100 * 1.05
        let det = MarkupDetector::new(small_config());
        let bars = base_with_last(5, bar(4, 100.0, 90.0, 106.0, 10_000));
        let c = det.classify(&bars);
        assert!(c.flagged);
        let s = c.signals().unwrap();
        assert_eq!(s.acc_high, 100.0);
        assert_eq!(s.higher_highs, Some(true));
    }

    #[test]
    fn flat_run_fails_when_strict() {
        let det = MarkupDetector::new(DetectorConfig {
            monotonicity: Monotonicity::Strict,
            ..small_config()
        });
        let bars = base_with_last(5, bar(4, 100.0, 90.0, 106.0, 10_000));
        let c = det.classify(&bars);
        assert!(!c.flagged);
        let s = c.signals().unwrap();
        assert!(s.breakout && s.volume_breakout);
        assert_eq!(s.higher_highs, Some(false));
        assert_eq!(s.higher_lows, Some(false));
    }

    #[test]
    fn volume_must_clear_multiplier() {
        let det = MarkupDetector::new(small_config());
        // avg volume = (4 * 1000 + 1400) / 5 = 1080; 1.5x = 1620 > 1400
        let bars = base_with_last(5, bar(4, 100.0, 90.0, 106.0, 1_400));
        let c = det.classify(&bars);
        assert!(!c.flagged);
        assert!(!c.signals().unwrap().volume_breakout);
    }

    #[test]
    fn single_bar_trend_window_skips_trend_check() {
        let det = MarkupDetector::new(DetectorConfig {
            accumulation_window: 5,
            trend_window: 1,
            monotonicity: Monotonicity::Strict,
            ..DetectorConfig::default()
        });
        let bars = base_with_last(5, bar(4, 100.0, 90.0, 106.0, 10_000));
        let c = det.classify(&bars);
        assert!(c.flagged);
        assert!(!c.signals().unwrap().trend_checked());
    }

    #[test]
    fn nan_in_window_is_malformed() {
        let det = MarkupDetector::new(small_config());
        let mut bars = base_with_last(5, bar(4, 100.0, 90.0, 106.0, 10_000));
        bars[2].low = f64::NAN;
        let c = det.classify(&bars);
        assert!(!c.flagged);
        assert!(matches!(c.verdict, Verdict::Malformed { .. }));
    }

    #[test]
    fn nan_outside_windows_is_ignored() {
        let det = MarkupDetector::new(small_config());
        let mut bars = base_with_last(8, bar(7, 100.0, 90.0, 106.0, 10_000));
        bars[0].high = f64::NAN;
        assert!(det.detect(&bars));
    }

    #[test]
    fn wrapper_matches_detector() {
        let config = small_config();
        let bars = base_with_last(5, bar(4, 100.0, 90.0, 106.0, 10_000));
        assert_eq!(detect_markup(&bars, &config), MarkupDetector::new(config).detect(&bars));
    }
}
