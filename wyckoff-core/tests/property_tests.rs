//! Property tests for detector invariants.
//!
//! Uses proptest to verify:
//! 1. Short history — a series shorter than the accumulation window is never flagged
//! 2. Determinism — the same series always classifies the same way
//! 3. Breakout is necessary — no flag unless the last close clears the window high
//! 4. Count invariants — summary count always matches its candidate list

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use wyckoff_core::domain::{Bar, ScanSummary};
use wyckoff_core::{DetectorConfig, MarkupDetector, Monotonicity};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_bar() -> impl Strategy<Value = (f64, f64, f64, u64)> {
    (50.0..150.0_f64, 0.0..10.0_f64, 0.0..1.2_f64, 0..1_000_000_u64).prop_map(
        |(high, spread, close_frac, volume)| {
            let low = high - spread;
            // close may land above the high to exercise breakouts
            let close = low + (high - low + 10.0) * close_frac;
            (high, low, close, volume)
        },
    )
}

fn arb_series(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(arb_bar(), len).prop_map(|rows| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        rows.into_iter()
            .enumerate()
            .map(|(i, (high, low, close, volume))| Bar {
                date: start + chrono::Duration::days(i as i64),
                open: low,
                high,
                low,
                close,
                volume,
            })
            .collect()
    })
}

fn arb_config() -> impl Strategy<Value = DetectorConfig> {
    (1..40_usize, 1..15_usize, 0.0..0.2_f64, 0.5..3.0_f64, any::<bool>()).prop_map(
        |(accumulation_window, trend_window, breakout_threshold, volume_multiplier, strict)| {
            DetectorConfig {
                accumulation_window,
                trend_window,
                breakout_threshold,
                volume_multiplier,
                monotonicity: if strict {
                    Monotonicity::Strict
                } else {
                    Monotonicity::NonStrict
                },
            }
        },
    )
}

proptest! {
    #[test]
    fn short_series_never_flagged(
        (config, bars) in arb_config().prop_flat_map(|c| {
            let w = c.accumulation_window;
            (Just(c), arb_series(0..w))
        })
    ) {
        prop_assert!(!MarkupDetector::new(config).detect(&bars));
    }

    #[test]
    fn classification_is_deterministic(config in arb_config(), bars in arb_series(0..80)) {
        let det = MarkupDetector::new(config);
        prop_assert_eq!(det.classify(&bars), det.classify(&bars.clone()));
    }

    #[test]
    fn breakout_is_necessary(
        (config, bars) in arb_config().prop_flat_map(|c| {
            let w = c.accumulation_window;
            (Just(c), arb_series(w..w + 40))
        })
    ) {
        let recent = &bars[bars.len() - config.accumulation_window..];
        let acc_high = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let last_close = bars.last().unwrap().close;
        let threshold = config.breakout_threshold;
        let flagged = MarkupDetector::new(config).detect(&bars);
        if last_close <= acc_high * (1.0 + threshold) {
            prop_assert!(!flagged);
        }
    }

    #[test]
    fn flagged_implies_volume_breakout(config in arb_config(), bars in arb_series(0..80)) {
        let c = MarkupDetector::new(config).classify(&bars);
        if c.flagged {
            let s = c.signals().unwrap();
            prop_assert!(s.breakout);
            prop_assert!(s.volume_breakout);
        }
    }

    #[test]
    fn summary_count_matches_candidates(
        total in 0..500_usize,
        names in prop::collection::vec("[A-Z]{2,8}", 0..20),
    ) {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let summary = ScanSummary::new(at, total, names.clone());
        prop_assert_eq!(summary.markup_count, names.len());
        prop_assert_eq!(summary.total_scanned, total);
    }
}
