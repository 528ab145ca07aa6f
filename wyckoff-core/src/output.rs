//! JSON artifacts — the scan summary and the markup dataset.
//!
//! Both documents are written once, at the end of a run. A write failure is
//! fatal: nothing was persisted incrementally, so the caller should surface
//! it rather than continue.

use crate::config::OutputConfig;
use crate::domain::{MarkupDataset, ScanSummary};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output dir {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Locations of the written artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub summary: PathBuf,
    pub dataset: PathBuf,
}

pub fn summary_json(summary: &ScanSummary) -> Result<String, OutputError> {
    to_pretty("scan summary", summary)
}

pub fn dataset_json(dataset: &MarkupDataset) -> Result<String, OutputError> {
    to_pretty("markup dataset", dataset)
}

/// Write both documents, creating the output directory if needed.
pub fn write_outputs(
    config: &OutputConfig,
    summary: &ScanSummary,
    dataset: &MarkupDataset,
) -> Result<OutputPaths, OutputError> {
    std::fs::create_dir_all(&config.dir).map_err(|source| OutputError::CreateDir {
        path: config.dir.clone(),
        source,
    })?;

    let paths = OutputPaths {
        summary: config.summary_path(),
        dataset: config.dataset_path(),
    };
    write_file(&paths.summary, &summary_json(summary)?)?;
    write_file(&paths.dataset, &dataset_json(dataset)?)?;
    Ok(paths)
}

pub fn load_summary(path: &Path) -> Result<ScanSummary, OutputError> {
    load(path)
}

pub fn load_dataset(path: &Path) -> Result<MarkupDataset, OutputError> {
    load(path)
}

fn to_pretty<T: Serialize>(what: &'static str, value: &T) -> Result<String, OutputError> {
    serde_json::to_string_pretty(value).map_err(|source| OutputError::Serialize { what, source })
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    std::fs::write(path, contents).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, OutputError> {
    let text = std::fs::read_to_string(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| OutputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
