//! Scan summary and the markup dataset persisted at the end of a run.

use super::bar::Series;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flagged bare symbol name → full cleaned history.
pub type MarkupDataset = BTreeMap<String, Series>;

/// Top-level result of one scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// ISO-8601 UTC instant at which the scan finished.
    pub timestamp: String,
    pub total_scanned: usize,
    pub markup_count: usize,
    pub markup_candidates: Vec<String>,
}

impl ScanSummary {
    /// Build a summary. `markup_count` is always derived from the candidate list.
    pub fn new(
        finished_at: DateTime<Utc>,
        total_scanned: usize,
        markup_candidates: Vec<String>,
    ) -> Self {
        Self {
            timestamp: finished_at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            total_scanned,
            markup_count: markup_candidates.len(),
            markup_candidates,
        }
    }
}
