//! Enriched record formatting and export.
//!
//! Flattens each record (matched publication or passed-through input row)
//! into the fixed 14-column output row and writes CSV or a raw JSON dump.
//! Nested publication structures are optional at every level; an absent
//! level yields an empty string, or [`NO_JOURNAL_INFO`] for the journal.

use crate::error::Result;
use crate::europepmc::{scalar_text, Publication};
use crate::priorities::{
    PriorityRecord, HEALTH_CATEGORY_COLUMN, NATIONAL_PRIORITY_COLUMN, ORIGINAL_TITLE_COLUMN,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// CSV column order for the enriched table
pub const OUTPUT_COLUMNS: &[&str] = &[
    "id", "doi", "originalTitle", "title", "authorString", "authorAffiliations",
    "journalTitle", "pubYear", "isOpenAccess", "keywords", "nationalPriorities",
    "healthCategories", "abstract", "urls",
];

/// Prefix put in front of every DOI, even an empty one
pub const DOI_PREFIX: &str = "https://doi.org/";

/// Journal title used when the record carries no journal information
pub const NO_JOURNAL_INFO: &str = "No Journal Info";

/// Separator for multi-valued fields
pub const FIELD_SEPARATOR: &str = "; ";

/// A matched publication tagged with the priority row it was found for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRecord {
    #[serde(flatten)]
    pub publication: Publication,
    #[serde(rename = "original title")]
    pub original_title: String,
    #[serde(rename = "national priority")]
    pub national_priority: String,
    #[serde(rename = "health category")]
    pub health_category: String,
}

/// Outcome of one priority row, before flattening
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnrichedRecord {
    Matched(MatchedRecord),
    /// The input row, with `original title` set
    Unmatched(PriorityRecord),
}

impl EnrichedRecord {
    /// Tag a publication with the priority row it matched
    pub fn matched(publication: Publication, row: &PriorityRecord) -> Self {
        Self::Matched(MatchedRecord {
            publication,
            original_title: row.title().to_string(),
            national_priority: row.national_priority().to_string(),
            health_category: row.health_category().to_string(),
        })
    }

    /// Pass an input row through with no publication
    pub fn unmatched(mut row: PriorityRecord) -> Self {
        let title = row.title().to_string();
        row.set(ORIGINAL_TITLE_COLUMN, title);
        Self::Unmatched(row)
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Identifier of the record (publication id or input `id`), possibly empty
    pub fn id(&self) -> &str {
        match self {
            Self::Matched(m) => m.publication.id().unwrap_or_default(),
            Self::Unmatched(row) => row.get_or_empty("id"),
        }
    }
}

/// One row of the enriched table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRow {
    pub id: String,
    pub doi: String,
    pub original_title: String,
    pub title: String,
    pub author_string: String,
    pub author_affiliations: String,
    pub journal_title: String,
    pub pub_year: String,
    pub is_open_access: String,
    pub keywords: String,
    pub national_priorities: String,
    pub health_categories: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub urls: String,
}

/// Flatten one record into an output row
pub fn format_record(record: &EnrichedRecord) -> OutputRow {
    match record {
        EnrichedRecord::Matched(m) => format_matched(m),
        EnrichedRecord::Unmatched(row) => format_unmatched(row),
    }
}

/// Flatten every record, preserving order
pub fn format_records(records: &[EnrichedRecord]) -> Vec<OutputRow> {
    records.iter().map(format_record).collect()
}

fn format_matched(record: &MatchedRecord) -> OutputRow {
    let p = &record.publication;
    let text = |key: &str| p.text(key).unwrap_or_default();

    OutputRow {
        id: text("id"),
        doi: format!("{}{}", DOI_PREFIX, text("doi")),
        original_title: record.original_title.clone(),
        title: text("title"),
        author_string: text("authorString"),
        author_affiliations: author_affiliations(p),
        journal_title: journal_title(p),
        pub_year: text("pubYear"),
        is_open_access: text("isOpenAccess"),
        keywords: keywords(p),
        national_priorities: record.national_priority.clone(),
        health_categories: record.health_category.clone(),
        abstract_text: text("abstractText"),
        urls: urls(p),
    }
}

// Unmatched rows go through the same column rules, read from the input row's
// own keys; an enriched table fed back in keeps its publication columns.
fn format_unmatched(row: &PriorityRecord) -> OutputRow {
    let text = |column: &str| row.get_or_empty(column).to_string();

    OutputRow {
        id: text("id"),
        doi: format!("{}{}", DOI_PREFIX, row.get_or_empty("doi")),
        original_title: text(ORIGINAL_TITLE_COLUMN),
        title: text("title"),
        author_string: text("authorString"),
        author_affiliations: String::new(),
        journal_title: NO_JOURNAL_INFO.to_string(),
        pub_year: text("pubYear"),
        is_open_access: text("isOpenAccess"),
        keywords: String::new(),
        national_priorities: text(NATIONAL_PRIORITY_COLUMN),
        health_categories: text(HEALTH_CATEGORY_COLUMN),
        abstract_text: text("abstractText"),
        urls: String::new(),
    }
}

/// Affiliations per author joined with "; ", then joined across authors.
///
/// Authors without an affiliation list, or whose list holds a null (or any
/// non-string) entry, contribute nothing.
pub fn author_affiliations(publication: &Publication) -> String {
    let Some(authors) = publication.pointer("/authorList/author").and_then(Value::as_array) else {
        return String::new();
    };

    authors
        .iter()
        .filter_map(|author| {
            author
                .pointer("/authorAffiliationsList/authorAffiliation")
                .and_then(Value::as_array)
        })
        .filter_map(|entries| entries.iter().map(Value::as_str).collect::<Option<Vec<&str>>>())
        .map(|affiliations| affiliations.join(FIELD_SEPARATOR))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// Full-text links as `documentStyle:url`, joined with "; "
pub fn urls(publication: &Publication) -> String {
    let entry_text = |entry: &Value, key: &str| entry.get(key).and_then(scalar_text).unwrap_or_default();

    publication
        .pointer("/fullTextUrlList/fullTextUrl")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| format!("{}:{}", entry_text(entry, "documentStyle"), entry_text(entry, "url")))
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR)
        })
        .unwrap_or_default()
}

/// Keyword list joined with "; "; non-string entries are skipped
pub fn keywords(publication: &Publication) -> String {
    publication
        .pointer("/keywordList/keyword")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR)
        })
        .unwrap_or_default()
}

/// Nested journal title, or [`NO_JOURNAL_INFO`]
pub fn journal_title(publication: &Publication) -> String {
    publication
        .pointer("/journalInfo/journal/title")
        .and_then(scalar_text)
        .unwrap_or_else(|| NO_JOURNAL_INFO.to_string())
}

/// Write the header and all rows, replacing any existing file
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    create_parent_dir(path)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Saved enriched table");
    Ok(())
}

/// Write the raw records as a pretty-printed JSON array (2-space indent)
pub fn write_json(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    create_parent_dir(path)?;

    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)?;

    info!(path = %path.display(), records = records.len(), "Saved JSON dump");
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
