//! Custom error types for priority-extractor.
//!
//! All library functions return `Result<T, ExtractorError>`. Lookup failures
//! that only concern one record are told apart from run-level failures with
//! [`ExtractorError::is_record_scoped`].

use thiserror::Error;

/// Main error type for priority-extractor operations.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// File I/O error (input missing/unreadable, output unwritable)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing error, including rows with inconsistent column counts
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Search service answered with a non-success status
    #[error("HTTP error: {status} for {url}")]
    Http {
        /// Status code returned by the service
        status: u16,
        /// Query URL that was requested
        url: String,
    },

    /// Network/transport error before a status was received
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed JSON body or JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input or response does not have the expected shape
    #[error("Format error: {0}")]
    Format(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// True when the failure only affects the lookup of a single record.
    ///
    /// The pipeline passes such records through unmatched and keeps going;
    /// every other error aborts the run.
    pub fn is_record_scoped(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Network(_))
    }
}

/// Result type alias using `ExtractorError`
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a format error message
    fn ok_or_format(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_format(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| ExtractorError::Format(msg.to_string()))
    }
}
