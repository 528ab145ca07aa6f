//! Universe — the ordered list of symbols one run scans, and where it came from.

use serde::{Deserialize, Serialize};

/// How the universe was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UniverseOrigin {
    /// Constituents of a named index, fetched from the remote listing.
    Remote { index: String },
    /// The remote listing failed; the built-in list was used instead.
    Fallback { reason: String },
    /// Supplied directly by the caller.
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub symbols: Vec<String>,
    pub origin: UniverseOrigin,
}

impl Universe {
    pub fn remote(index: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            symbols,
            origin: UniverseOrigin::Remote { index: index.into() },
        }
    }

    pub fn fallback(reason: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            symbols,
            origin: UniverseOrigin::Fallback { reason: reason.into() },
        }
    }

    pub fn explicit(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            origin: UniverseOrigin::Explicit,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, UniverseOrigin::Fallback { .. })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_observable() {
        let u = Universe::fallback("offline", vec!["TCS.NS".into()]);
        assert!(u.is_fallback());
        assert_eq!(u.len(), 1);
        assert!(!Universe::explicit(vec![]).is_fallback());
    }

    #[test]
    fn iteration_preserves_order() {
        let u = Universe::remote("NIFTY 500", vec!["B.NS".into(), "A.NS".into()]);
        assert_eq!(u.iter().collect::<Vec<_>>(), vec!["B.NS", "A.NS"]);
    }
}
