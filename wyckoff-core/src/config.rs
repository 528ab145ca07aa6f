//! Serializable scan configuration.
//!
//! Every tunable of a run lives here: detector thresholds, the symbol-list
//! endpoint, the historical-data provider, pacing and output locations. The
//! config is loaded from TOML with all fields defaulted, so an empty file is
//! valid, and is passed explicitly into each component.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one scan run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub detector: DetectorConfig,
    pub symbols: SymbolSourceConfig,
    pub provider: ProviderConfig,
    pub scan: ScanSettings,
    pub output: OutputConfig,
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would make the detector or driver meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detector;
        if d.accumulation_window == 0 {
            return Err(ConfigError::Invalid("detector.accumulation_window must be >= 1".into()));
        }
        if d.trend_window == 0 {
            return Err(ConfigError::Invalid("detector.trend_window must be >= 1".into()));
        }
        if !d.breakout_threshold.is_finite() || d.breakout_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "detector.breakout_threshold must be a non-negative number, got {}",
                d.breakout_threshold
            )));
        }
        if !d.volume_multiplier.is_finite() || d.volume_multiplier < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "detector.volume_multiplier must be a non-negative number, got {}",
                d.volume_multiplier
            )));
        }
        if self.scan.lookback_days == 0 {
            return Err(ConfigError::Invalid("scan.lookback_days must be >= 1".into()));
        }
        if self.symbols.fallback.is_empty() {
            return Err(ConfigError::Invalid(
                "symbols.fallback must list at least one symbol".into(),
            ));
        }
        Ok(())
    }
}

/// How consecutive bars are compared in the trend window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Monotonicity {
    /// Each value must be >= the previous one; flat runs count as rising.
    #[default]
    NonStrict,
    /// Each value must be > the previous one.
    Strict,
}

impl Monotonicity {
    pub fn holds(self, prev: f64, next: f64) -> bool {
        match self {
            Monotonicity::NonStrict => next >= prev,
            Monotonicity::Strict => next > prev,
        }
    }
}

/// Markup detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Trailing bars used for the reference high and average volume.
    pub accumulation_window: usize,
    /// Fraction above the window high the last close must clear.
    pub breakout_threshold: f64,
    /// Multiple of the window's mean volume the last volume must clear.
    pub volume_multiplier: f64,
    /// Trailing bars checked for higher highs / higher lows.
    pub trend_window: usize,
    pub monotonicity: Monotonicity,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            accumulation_window: 30,
            breakout_threshold: 0.05,
            volume_multiplier: 1.5,
            trend_window: 10,
            monotonicity: Monotonicity::NonStrict,
        }
    }
}

/// Browser-like identification; the NSE endpoint rejects bare clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; WyckoffScanner/1.0)";

/// Index constituents endpoint and the fallback universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolSourceConfig {
    /// Provider root, fetched first to obtain session cookies.
    pub base_url: String,
    pub constituents_path: String,
    pub index: String,
    /// Exchange suffix appended to each bare ticker.
    pub suffix: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Universe used when the remote listing cannot be retrieved.
    pub fallback: Vec<String>,
}

impl Default for SymbolSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".into(),
            constituents_path: "/api/equity-stockIndices".into(),
            index: "NIFTY 500".into(),
            suffix: ".NS".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout_secs: 10,
            fallback: ["RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "INFY.NS", "LT.NS"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SymbolSourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Strip the exchange suffix: `RELIANCE.NS` → `RELIANCE`.
    pub fn bare_name<'a>(&self, symbol: &'a str) -> &'a str {
        if self.suffix.is_empty() {
            return symbol;
        }
        symbol.strip_suffix(self.suffix.as_str()).unwrap_or(symbol)
    }
}

/// Historical-data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pacing of the scan loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Trailing calendar days of history requested per symbol.
    pub lookback_days: u32,
    /// Pause between consecutive symbols.
    pub symbol_delay_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            lookback_days: 200,
            symbol_delay_ms: 200,
        }
    }
}

impl ScanSettings {
    pub fn symbol_delay(&self) -> Duration {
        Duration::from_millis(self.symbol_delay_ms)
    }
}

/// Where the two JSON documents are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub summary_file: String,
    pub dataset_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            summary_file: "markup_candidates.json".into(),
            dataset_file: "markup_stock_data.json".into(),
        }
    }
}

impl OutputConfig {
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.dir.join(&self.dataset_file)
    }
}
