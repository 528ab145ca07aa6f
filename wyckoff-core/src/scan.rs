//! Scan driver — fetch, clean and classify each symbol in turn.
//!
//! Strictly sequential: one provider request at a time, with a fixed pause
//! between symbols. A symbol that fails or returns nothing is recorded and
//! skipped; it never aborts the run.

use crate::config::{ScanConfig, ScanSettings, SymbolSourceConfig};
use crate::data::{clean_bars, DataError, DataProvider, Universe, UniverseOrigin};
use crate::detector::MarkupDetector;
use crate::domain::{MarkupDataset, ScanSummary};
use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

/// What happened to one symbol.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// Matched the markup pattern; its series is in the dataset under `name`.
    Flagged { name: String },
    /// Classified, not flagged.
    Clear,
    /// Provider returned no usable rows.
    NoData,
    Failed(DataError),
}

#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct ScanReport {
    pub summary: ScanSummary,
    pub dataset: MarkupDataset,
    pub origin: UniverseOrigin,
    pub symbols: Vec<SymbolReport>,
}

impl ScanReport {
    pub fn failed(&self) -> usize {
        self.symbols
            .iter()
            .filter(|r| matches!(r.outcome, SymbolOutcome::Failed(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.symbols
            .iter()
            .filter(|r| matches!(r.outcome, SymbolOutcome::NoData))
            .count()
    }
}

/// Progress callback for the scan loop. `index` is zero-based.
pub trait ScanProgress {
    fn on_symbol(&self, symbol: &str, index: usize, total: usize, outcome: &SymbolOutcome);

    fn on_scan_start(&self, _total: usize) {}
}

/// Prints one line per symbol to stdout.
pub struct StdoutProgress;

impl ScanProgress for StdoutProgress {
    fn on_scan_start(&self, total: usize) {
        println!("Scanning {total} symbols (this may take several minutes)...");
    }

    fn on_symbol(&self, symbol: &str, index: usize, total: usize, outcome: &SymbolOutcome) {
        let pos = index + 1;
        match outcome {
            SymbolOutcome::Flagged { name } => println!("[{pos}/{total}] MARKUP -> {name}"),
            SymbolOutcome::Clear => println!("[{pos}/{total}] OK -> {symbol}"),
            SymbolOutcome::NoData => println!("[{pos}/{total}] No data for {symbol}"),
            SymbolOutcome::Failed(e) => println!("[{pos}/{total}] Error {symbol}: {e}"),
        }
    }
}

/// Silent progress, for tests and callers that only want the report.
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_symbol(&self, _symbol: &str, _index: usize, _total: usize, _outcome: &SymbolOutcome) {}
}

pub struct Scanner<'a> {
    provider: &'a dyn DataProvider,
    detector: MarkupDetector,
    symbols: SymbolSourceConfig,
    settings: ScanSettings,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &ScanConfig, provider: &'a dyn DataProvider) -> Self {
        Self {
            provider,
            detector: MarkupDetector::new(config.detector.clone()),
            symbols: config.symbols.clone(),
            settings: config.scan.clone(),
        }
    }

    /// Scan with a lookback window ending today (UTC).
    pub fn scan(&self, universe: &Universe, progress: &dyn ScanProgress) -> ScanReport {
        self.scan_until(universe, Utc::now().date_naive(), progress)
    }

    /// Scan with a lookback window ending on `end`.
    pub fn scan_until(
        &self,
        universe: &Universe,
        end: NaiveDate,
        progress: &dyn ScanProgress,
    ) -> ScanReport {
        let start = end - Duration::days(i64::from(self.settings.lookback_days));
        let total = universe.len();
        let delay = self.settings.symbol_delay();

        let mut candidates = Vec::new();
        let mut dataset = MarkupDataset::new();
        let mut reports = Vec::with_capacity(total);

        info!(total, provider = self.provider.name(), %start, %end, "starting scan");
        progress.on_scan_start(total);

        for (i, symbol) in universe.iter().enumerate() {
            let outcome = self.scan_symbol(symbol, start, end, &mut candidates, &mut dataset);
            progress.on_symbol(symbol, i, total, &outcome);
            reports.push(SymbolReport {
                symbol: symbol.to_string(),
                outcome,
            });

            if i + 1 < total && !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }

        let summary = ScanSummary::new(Utc::now(), total, candidates);
        info!(
            total = summary.total_scanned,
            flagged = summary.markup_count,
            "scan complete"
        );

        ScanReport {
            summary,
            dataset,
            origin: universe.origin.clone(),
            symbols: reports,
        }
    }

    fn scan_symbol(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        candidates: &mut Vec<String>,
        dataset: &mut MarkupDataset,
    ) -> SymbolOutcome {
        let fetched = match self.provider.fetch(symbol, start, end) {
            Ok(f) => f,
            Err(e) => {
                warn!(symbol, error = %e, "fetch failed, skipping");
                return SymbolOutcome::Failed(e);
            }
        };

        if fetched.bars.is_empty() {
            debug!(symbol, "provider returned no rows");
            return SymbolOutcome::NoData;
        }

        let cleaned = clean_bars(fetched.bars);
        if cleaned.incomplete > 0 || cleaned.duplicates > 0 {
            debug!(
                symbol,
                incomplete = cleaned.incomplete,
                duplicates = cleaned.duplicates,
                "dropped rows"
            );
        }
        if cleaned.bars.is_empty() {
            return SymbolOutcome::NoData;
        }

        let classification = self.detector.classify(&cleaned.bars);
        debug!(symbol, verdict = ?classification.verdict, "classified");
        if !classification.flagged {
            return SymbolOutcome::Clear;
        }

        let name = self.symbols.bare_name(symbol).to_string();
        // a repeated symbol keeps a single candidate entry
        if dataset.insert(name.clone(), cleaned.bars).is_none() {
            candidates.push(name.clone());
        }
        SymbolOutcome::Flagged { name }
    }
}
