//! Extraction pipeline driver.
//!
//! Load -> lookup -> match -> format/export, one record at a time in input
//! order. Every input row yields exactly one enriched record. A lookup that
//! fails with an HTTP or network error leaves its row unmatched; any other
//! error aborts the run before anything is written.

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::europepmc::{EuropePmcClient, Publication};
use crate::export::{self, EnrichedRecord};
use crate::matcher;
use crate::priorities::{self, PriorityRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Rows whose lookup failed and were passed through unmatched
    pub failed_lookups: usize,
}

/// Enriches a priority table against Europe PMC
pub struct Extractor {
    client: EuropePmcClient,
    config: ExtractorConfig,
}

impl Extractor {
    /// Validate the configuration and build the HTTP client
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let client = EuropePmcClient::with_base_url(config.base_url.clone())?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run the whole pipeline and write the configured outputs
    pub async fn run(&self) -> Result<RunSummary> {
        let table = priorities::read_priorities(&self.config.input)?;
        debug!(header = ?table.header, "Priority table header");

        let (records, summary) = self.enrich(table.rows).await?;

        for record in &records {
            println!("{}", record.id());
        }
        let rows = export::format_records(&records);

        if self.config.overwrites_input() {
            info!(path = %self.config.output.display(), "Overwriting input table with enriched output");
        }
        export::write_csv(&self.config.output, &rows)?;

        if let Some(json_path) = &self.config.json_output {
            export::write_json(json_path, &records)?;
        }

        println!(
            "Enriched {} rows: {} matched, {} unmatched ({} failed lookups)",
            summary.total, summary.matched, summary.unmatched, summary.failed_lookups
        );
        Ok(summary)
    }

    /// Look up every row in order and tag the matches
    pub async fn enrich(
        &self,
        rows: Vec<PriorityRecord>,
    ) -> Result<(Vec<EnrichedRecord>, RunSummary)> {
        let total = rows.len();
        let mut records = Vec::with_capacity(total);
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        info!(total = total, "Starting Europe PMC enrichment");

        for (idx, row) in rows.into_iter().enumerate() {
            println!("Extracting {}/{}", idx + 1, total);

            let publication = match self.lookup(&row).await {
                Ok(publication) => publication,
                Err(e) if e.is_record_scoped() => {
                    warn!(row = idx + 1, title = row.title(), error = %e, "Lookup failed, keeping row unmatched");
                    summary.failed_lookups += 1;
                    None
                }
                Err(e) => return Err(e),
            };

            match publication {
                Some(publication) => {
                    summary.matched += 1;
                    records.push(EnrichedRecord::matched(publication, &row));
                }
                None => {
                    summary.unmatched += 1;
                    records.push(EnrichedRecord::unmatched(row));
                }
            }
        }

        info!(
            total = summary.total,
            matched = summary.matched,
            unmatched = summary.unmatched,
            failed = summary.failed_lookups,
            "Enrichment complete"
        );
        Ok((records, summary))
    }

    /// Query by identifier when the row has one, otherwise by title
    pub async fn lookup(&self, row: &PriorityRecord) -> Result<Option<Publication>> {
        let (term, by_id) = match row.id() {
            Some(id) => (id, true),
            None => (row.title(), false),
        };

        let url = self.client.search_url(term);
        println!("{}", url);

        let results = self.client.fetch_results(&url).await?;
        let found = if by_id {
            matcher::match_id(term, &results)
        } else {
            matcher::match_title(term, &results)
        };

        debug!(term = term, by_id = by_id, matched = found.is_some(), "Matched result list");
        Ok(found.cloned())
    }
}
