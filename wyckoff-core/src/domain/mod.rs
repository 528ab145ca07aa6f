//! Domain types: bars, series and scan results.

pub mod bar;
pub mod summary;

pub use bar::{Bar, Series};
pub use summary::{MarkupDataset, ScanSummary};
