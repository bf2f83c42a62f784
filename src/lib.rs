//! # priority-extractor
//!
//! Enriches a table of national research priorities with bibliographic
//! metadata from Europe PMC and writes a flat 14-column export.
//!
//! ## Modules
//!
//! - [`priorities`] - Priority table loader
//! - [`europepmc`] - Europe PMC search client and publication model
//! - [`matcher`] - Identifier and title-prefix matching
//! - [`export`] - Record flattening, CSV and JSON export
//! - [`pipeline`] - Sequential enrichment driver
//! - [`config`] - Run configuration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use priority_extractor::{ExtractorConfig, Extractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = Extractor::new(ExtractorConfig::default())?.run().await?;
//!     println!("Matched {} of {} rows", summary.matched, summary.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod europepmc;
pub mod export;
pub mod matcher;
pub mod pipeline;
pub mod priorities;

pub use config::ExtractorConfig;
pub use error::{ExtractorError, Result};
pub use pipeline::{Extractor, RunSummary};
