//! Europe PMC REST API client.
//!
//! One GET per lookup against the `search` endpoint (core result type, JSON,
//! first page of up to 1000 results). No retry and no pagination: a
//! non-success status is returned as [`ExtractorError::Http`] and left to the
//! caller.
//!
//! Endpoint: https://www.ebi.ac.uk/europepmc/webservices/rest/search

use crate::error::{ExtractorError, OptionExt, Result};
use crate::matcher;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Europe PMC search endpoint
pub const EPMC_SEARCH_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";

/// Results requested per query (single page)
pub const PAGE_SIZE: usize = 1000;

const USER_AGENT: &str = "priority-extractor/0.1";

/// A publication record from the `core` result type.
///
/// Kept as the parsed JSON object the service returned, so the record
/// serializes back unchanged (explicit nulls included). Fields are read by
/// optional chaining; a missing or oddly typed field reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Publication(Value);

impl Publication {
    /// Top-level field, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Nested field by JSON pointer (e.g. `/journalInfo/journal/title`)
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        self.0.pointer(path)
    }

    /// Top-level scalar field rendered as text
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// Europe PMC identifier, when it is a string
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    /// Title, when it is a string
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }
}

/// Text of a scalar JSON value; null, arrays and objects have none
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Search response envelope: `{ resultList: { result: [...] } }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    result_list: Option<ResultList>,
}

#[derive(Debug, Deserialize)]
struct ResultList {
    result: Option<Vec<Publication>>,
}

/// Europe PMC API client
pub struct EuropePmcClient {
    client: Client,
    base_url: String,
}

impl EuropePmcClient {
    /// Create a client against the public Europe PMC endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(EPMC_SEARCH_URL)
    }

    /// Create a client against a custom search endpoint (mirror or mock)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExtractorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Query URL for a search term (identifier or free-text title)
    pub fn search_url(&self, term: &str) -> String {
        build_search_url(&self.base_url, term)
    }

    /// Search for a term and return the first page of results
    pub async fn search(&self, term: &str) -> Result<Vec<Publication>> {
        let url = self.search_url(term);
        self.fetch_results(&url).await
    }

    /// Issue one GET for a prebuilt query URL and parse the result list
    pub async fn fetch_results(&self, url: &str) -> Result<Vec<Publication>> {
        debug!(url = %url, "Querying Europe PMC");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ExtractorError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let results = parse_response(&body)?;

        info!(url = %url, count = results.len(), "Europe PMC search returned results");
        Ok(results)
    }

    /// Look up a publication by its exact Europe PMC identifier
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Publication>> {
        let results = self.search(id).await?;
        Ok(matcher::match_id(id, &results).cloned())
    }

    /// Look up a publication by title-prefix match
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Publication>> {
        let results = self.search(title).await?;
        Ok(matcher::match_title(title, &results).cloned())
    }
}

/// Build the search URL: fixed query parameters plus the form-encoded term
pub fn build_search_url(base_url: &str, term: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}resultType=core&pageSize={}&format=json&query={}",
        base_url, separator, PAGE_SIZE, encoded
    )
}

/// Parse a search response body into its result list
pub fn parse_response(body: &str) -> Result<Vec<Publication>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    response
        .result_list
        .ok_or_format("Search response has no resultList")?
        .result
        .ok_or_format("Search response has no resultList.result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_url() {
        let url = build_search_url(EPMC_SEARCH_URL, "Effects of X on Y");
        assert_eq!(
            url,
            "https://www.ebi.ac.uk/europepmc/webservices/rest/search?resultType=core&pageSize=1000&format=json&query=Effects+of+X+on+Y"
        );
    }

    #[test]
    fn test_build_search_url_encodes_reserved() {
        let url = build_search_url("http://localhost:8080/search", "a&b=c: d/e");
        assert!(url.starts_with("http://localhost:8080/search?resultType=core"));
        assert!(url.ends_with("query=a%26b%3Dc%3A+d%2Fe"));
    }

    #[test]
    fn test_parse_response_nested_fields() -> Result<()> {
        let body = r#"{
            "hitCount": 1,
            "resultList": { "result": [{
                "id": "PMC1",
                "source": "PMC",
                "title": "A title",
                "authorList": { "author": [
                    { "fullName": "Doe J", "authorAffiliationsList": { "authorAffiliation": ["Uni A", null] } }
                ]},
                "journalInfo": { "journal": { "title": "Journal X", "issn": "1234" }, "volume": "3" },
                "citedByCount": 4
            }]}
        }"#;

        let results = parse_response(body)?;
        assert_eq!(results.len(), 1);
        let publication = &results[0];
        assert_eq!(publication.id(), Some("PMC1"));
        assert_eq!(publication.title(), Some("A title"));
        assert_eq!(publication.text("source").as_deref(), Some("PMC"));
        assert_eq!(publication.text("citedByCount").as_deref(), Some("4"));
        assert_eq!(
            publication.pointer("/journalInfo/journal/title"),
            Some(&Value::from("Journal X"))
        );
        assert_eq!(
            publication.pointer("/authorList/author/0/authorAffiliationsList/authorAffiliation/1"),
            Some(&Value::Null)
        );
        Ok(())
    }

    #[test]
    fn test_parse_response_tolerates_odd_typed_candidates() -> Result<()> {
        let body = r#"{"resultList":{"result":[
            {"id":"OTHER","pubYear":2019,"keywordList":{"keyword":["a",null]}},
            {"id":42,"title":["not","a","string"]},
            "not even an object",
            {"id":"PMC1","title":"Target","pubYear":"2020"}
        ]}}"#;

        let results = parse_response(body)?;
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].text("pubYear").as_deref(), Some("2019"));
        assert_eq!(results[1].id(), None);
        assert_eq!(results[1].title(), None);
        assert_eq!(results[2].id(), None);
        assert_eq!(results[3].id(), Some("PMC1"));
        assert_eq!(results[3].text("pubYear").as_deref(), Some("2020"));
        Ok(())
    }

    #[test]
    fn test_parse_response_keeps_raw_record() -> Result<()> {
        let body = r#"{"resultList":{"result":[{"id":"1","doi":null,"title":null,"pmid":"99","journalInfo":{"volume":"2"}}]}}"#;
        let results = parse_response(body)?;
        let raw = serde_json::to_value(&results[0])?;
        assert_eq!(
            raw,
            serde_json::json!({"id": "1", "doi": null, "title": null, "pmid": "99", "journalInfo": {"volume": "2"}})
        );
        assert_eq!(results[0].text("doi"), None);
        Ok(())
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&Value::from("Y")).as_deref(), Some("Y"));
        assert_eq!(scalar_text(&Value::from(2019)).as_deref(), Some("2019"));
        assert_eq!(scalar_text(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&serde_json::json!(["a"])), None);
    }

    #[test]
    fn test_parse_response_bad_shape() {
        assert!(matches!(parse_response("{}"), Err(ExtractorError::Format(_))));
        assert!(matches!(
            parse_response(r#"{"resultList":{}}"#),
            Err(ExtractorError::Format(_))
        ));
        assert!(matches!(parse_response("not json"), Err(ExtractorError::Json(_))));
    }
}
