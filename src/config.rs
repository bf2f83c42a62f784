//! Run configuration.
//!
//! The defaults reproduce the historical behavior of the extractor: read
//! `data/national-priorities.csv`, enrich it against Europe PMC and write the
//! result back over the same file.

use crate::error::{ExtractorError, Result};
use crate::europepmc::EPMC_SEARCH_URL;
use std::path::PathBuf;

/// Default input and output table
pub const DEFAULT_PRIORITIES_CSV: &str = "data/national-priorities.csv";

/// Paths and endpoint for one extraction run
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Priority table to read
    pub input: PathBuf,
    /// Enriched table to write (may be the same file as `input`)
    pub output: PathBuf,
    /// Optional pretty-printed JSON dump of the raw records
    pub json_output: Option<PathBuf>,
    /// Search endpoint; query parameters are appended to it
    pub base_url: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_PRIORITIES_CSV),
            output: PathBuf::from(DEFAULT_PRIORITIES_CSV),
            json_output: None,
            base_url: EPMC_SEARCH_URL.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Check values that would otherwise only fail after every lookup has run
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ExtractorError::Config("Search base URL is empty".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| ExtractorError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        if self.output.as_os_str().is_empty() {
            return Err(ExtractorError::Config("Output path is empty".to_string()));
        }
        Ok(())
    }

    /// Whether this run overwrites its own input table
    pub fn overwrites_input(&self) -> bool {
        self.input == self.output
    }
}
