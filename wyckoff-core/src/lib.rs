//! Wyckoff Core — symbol source, data provider, markup detector and scan driver.
//!
//! This crate contains the whole scan pipeline:
//! - Configuration (detector thresholds, endpoints, pacing, output paths)
//! - Symbol source with a built-in fallback universe
//! - Yahoo Finance daily history provider and bar cleaning
//! - Markup detector (accumulation breakout with volume and trend confirmation)
//! - Sequential scan driver and JSON output

pub mod config;
pub mod data;
pub mod detector;
pub mod domain;
pub mod output;
pub mod scan;

pub use config::{ConfigError, DetectorConfig, Monotonicity, ScanConfig};
pub use detector::{detect_markup, Classification, MarkupDetector, MarkupSignals, Verdict};
pub use output::{write_outputs, OutputError, OutputPaths};
pub use scan::{NoProgress, ScanProgress, ScanReport, Scanner, StdoutProgress, SymbolOutcome};
