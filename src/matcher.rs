//! Result-list matching heuristics.
//!
//! Both strategies are a linear scan in result-list order; the first hit wins
//! and the service's own relevance ranking is taken as is.

use crate::europepmc::Publication;

/// Number of leading title words compared by the title-prefix match
pub const TITLE_PREFIX_WORDS: usize = 7;

/// First result whose `id` equals `id` exactly (case-sensitive)
pub fn match_id<'a>(id: &str, results: &'a [Publication]) -> Option<&'a Publication> {
    results.iter().find(|p| p.id() == Some(id))
}

/// First result whose title starts with the first seven words of `title`.
///
/// Results without a string title are skipped.
pub fn match_title<'a>(title: &str, results: &'a [Publication]) -> Option<&'a Publication> {
    let prefix = title_prefix(title);
    results.iter().find(|p| {
        p.title()
            .is_some_and(|candidate| candidate.starts_with(&prefix))
    })
}

/// First [`TITLE_PREFIX_WORDS`] whitespace-delimited words, joined by single spaces
pub fn title_prefix(title: &str) -> String {
    title
        .split_whitespace()
        .take(TITLE_PREFIX_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
