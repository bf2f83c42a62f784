//! National priorities table loader.
//!
//! Reads the comma-delimited priority table (UTF-8, optional byte-order mark,
//! header row required) into ordered rows keyed by column name.

use crate::error::{ExtractorError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::Path;
use tracing::{debug, info};

/// Column holding the publication identifier (optional)
pub const ID_COLUMN: &str = "id";
/// Column holding the free-text title
pub const TITLE_COLUMN: &str = "title";
/// Column holding the national priority tag
pub const NATIONAL_PRIORITY_COLUMN: &str = "national priority";
/// Column holding the health category tag
pub const HEALTH_CATEGORY_COLUMN: &str = "health category";
/// Column appended by the loader, carrying the input title through the run
pub const ORIGINAL_TITLE_COLUMN: &str = "original title";

/// Columns every priority table must have
pub const REQUIRED_COLUMNS: &[&str] = &[TITLE_COLUMN, NATIONAL_PRIORITY_COLUMN, HEALTH_CATEGORY_COLUMN];

/// One row of the priority table, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityRecord {
    fields: Vec<(String, String)>,
}

impl PriorityRecord {
    /// Build a record from `(column, value)` pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&str> {
        // Later duplicates of a header name win.
        self.fields
            .iter()
            .rev()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a column, or the empty string
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or_default()
    }

    /// Set a column, replacing an existing value or appending a new column
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().rev().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    /// Identifier to look up by, when present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.get(ID_COLUMN).filter(|id| !id.is_empty())
    }

    pub fn title(&self) -> &str {
        self.get_or_empty(TITLE_COLUMN)
    }

    pub fn national_priority(&self) -> &str {
        self.get_or_empty(NATIONAL_PRIORITY_COLUMN)
    }

    pub fn health_category(&self) -> &str {
        self.get_or_empty(HEALTH_CATEGORY_COLUMN)
    }
}

impl Serialize for PriorityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Loaded priority table
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    /// Source header, with [`ORIGINAL_TITLE_COLUMN`] appended
    pub header: Vec<String>,
    pub rows: Vec<PriorityRecord>,
}

/// Read the priority table at `path`.
///
/// # Errors
///
/// * `Io` if the file is missing or unreadable
/// * `Csv` if rows have inconsistent column counts or invalid UTF-8
/// * `Format` if a required column is missing from the header
pub fn read_priorities(path: &Path) -> Result<PriorityTable> {
    debug!(path = %path.display(), "Reading priority table");
    let bytes = std::fs::read(path)?;
    let table = parse_priorities(&bytes)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.header.len(),
        "Loaded priority table"
    );
    Ok(table)
}

/// Parse a priority table from raw bytes
pub fn parse_priorities(bytes: &[u8]) -> Result<PriorityTable> {
    // csv-core skips a leading UTF-8 byte-order mark.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let mut header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    for required in REQUIRED_COLUMNS {
        if !header.iter().any(|h| h == required) {
            return Err(ExtractorError::Format(format!(
                "Priority table is missing required column '{}'",
                required
            )));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(PriorityRecord::from_pairs(
            header.iter().cloned().zip(record.iter().map(str::to_string)),
        ));
    }

    header.push(ORIGINAL_TITLE_COLUMN.to_string());

    Ok(PriorityTable { header, rows })
}
