//! NSE index constituents as the symbol source.
//!
//! The endpoint refuses requests without session cookies, so the provider
//! root is fetched first with a cookie-storing client, then the constituents
//! path. Any failure degrades to the configured fallback universe.

use super::provider::DataError;
use super::universe::Universe;
use crate::config::SymbolSourceConfig;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct ConstituentsResponse {
    data: Vec<Constituent>,
}

#[derive(Debug, Deserialize)]
struct Constituent {
    #[serde(default)]
    symbol: Option<String>,
}

/// Parse a constituents payload into exchange-qualified symbols.
///
/// Entries without a non-empty `symbol` are skipped.
pub fn parse_constituents(body: &str, suffix: &str) -> Result<Vec<String>, DataError> {
    let resp: ConstituentsResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("constituents payload: {e}")))?;

    Ok(resp
        .data
        .into_iter()
        .filter_map(|c| c.symbol)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}{suffix}"))
        .collect())
}

pub struct IndexSymbolSource {
    client: reqwest::blocking::Client,
    config: SymbolSourceConfig,
}

impl IndexSymbolSource {
    pub fn new(config: &SymbolSourceConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch the index constituents without falling back.
    pub fn try_fetch(&self) -> Result<Vec<String>, DataError> {
        let base = self.config.base_url.trim_end_matches('/');

        // Handshake for cookies; its status does not matter, only reachability
        self.client.get(base).send()?;

        let url = format!(
            "{base}{}?index={}",
            self.config.constituents_path,
            urlencoding::encode(&self.config.index)
        );
        let resp = self.client.get(&url).send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DataError::AuthenticationRequired(format!(
                "constituents request blocked (HTTP {status})"
            )));
        }
        if !status.is_success() {
            return Err(DataError::Other(format!(
                "HTTP {status} for index {}",
                self.config.index
            )));
        }

        let body = resp.text()?;
        let symbols = parse_constituents(&body, &self.config.suffix)?;
        if symbols.is_empty() {
            return Err(DataError::ResponseFormatChanged(format!(
                "index {} listed no constituents",
                self.config.index
            )));
        }
        Ok(symbols)
    }

    /// Resolve the universe. Never fails: errors fall back to the built-in list.
    pub fn universe(&self) -> Universe {
        match self.try_fetch() {
            Ok(symbols) => {
                info!(
                    index = %self.config.index,
                    count = symbols.len(),
                    "fetched index constituents"
                );
                Universe::remote(self.config.index.clone(), symbols)
            }
            Err(e) => fallback_universe(&self.config, e),
        }
    }
}

/// Resolve the universe from a config, covering client construction failure too.
pub fn resolve_universe(config: &SymbolSourceConfig) -> Universe {
    match IndexSymbolSource::new(config) {
        Ok(source) => source.universe(),
        Err(e) => fallback_universe(config, e),
    }
}

fn fallback_universe(config: &SymbolSourceConfig, err: DataError) -> Universe {
    warn!(
        index = %config.index,
        error = %err,
        fallback = config.fallback.len(),
        "couldn't fetch index constituents, using fallback list"
    );
    Universe::fallback(err.to_string(), config.fallback.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_with_suffix() {
        let body = r#"{"name":"NIFTY 500","data":[{"symbol":"RELIANCE","lastPrice":1},
            {"symbol":"TCS"}]}"#;
        assert_eq!(
            parse_constituents(body, ".NS").unwrap(),
            vec!["RELIANCE.NS", "TCS.NS"]
        );
    }

    #[test]
    fn skips_entries_without_symbol() {
        let body = r#"{"data":[{"symbol":""},{"identifier":"x"},{"symbol":"INFY"}]}"#;
        assert_eq!(parse_constituents(body, ".NS").unwrap(), vec!["INFY.NS"]);
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_constituents("<html>blocked</html>", ".NS").unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn rejects_missing_data_field() {
        assert!(parse_constituents(r#"{"message":"denied"}"#, ".NS").is_err());
    }
}
