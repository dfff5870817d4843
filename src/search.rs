//! News-search service client.
//!
//! Sends the user's keyword to a SerpAPI-style Google News endpoint
//! (`engine=google`, `tbm=nws`) and maps the JSON response to
//! [`SearchResult`] records. One outbound call per run.
//!
//! A missing or empty `news_results` array is a normal outcome (zero
//! results), not an error. Transport and service errors are returned to the
//! caller, which renders them as a terminal failed-search notice instead of
//! crashing the run.

use crate::models::SearchResult;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Maximum number of results requested per search.
pub const RESULT_LIMIT: usize = 10;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("news_research/", env!("CARGO_PKG_VERSION"));

/// Wire shape of the search response; only `news_results` is read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news_results: Vec<NewsResultEntry>,
}

#[derive(Debug, Deserialize)]
struct NewsResultEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    source: SourceField,
}

/// The service reports the publisher either as a plain string or as an
/// object with a `name` field, depending on API vintage.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceField {
    Name(String),
    Detailed {
        #[serde(default)]
        name: String,
    },
}

impl Default for SourceField {
    fn default() -> Self {
        SourceField::Name(String::new())
    }
}

impl SourceField {
    fn into_name(self) -> String {
        match self {
            SourceField::Name(name) => name,
            SourceField::Detailed { name } => name,
        }
    }
}

/// Client for the news-search service.
///
/// Owns a single `reqwest::Client` with an explicit timeout, constructed
/// once at startup.
#[derive(Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SearchClient {
    /// Build a search client for the given endpoint and credential.
    pub fn new(endpoint: String, api_key: String) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Search the news vertical for a keyword.
    ///
    /// Returns the ordered result list, which may be empty. Errors indicate
    /// a transport failure, a non-success status, or an unparseable body.
    #[instrument(level = "info", skip(self))]
    pub async fn search_news(&self, keyword: &str) -> Result<Vec<SearchResult>, Box<dyn Error>> {
        let url = format!(
            "{}?engine=google&tbm=nws&num={}&q={}&api_key={}",
            self.endpoint,
            RESULT_LIMIT,
            urlencoding::encode(keyword),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("search service returned status {status}").into());
        }

        let body = response.text().await?;
        let results = parse_results(&body)?;
        info!(count = results.len(), keyword, "Search returned news results");
        Ok(results)
    }
}

/// Parse a search response body into results.
///
/// Entries without a link cannot be processed downstream and are skipped
/// with a warning.
fn parse_results(body: &str) -> Result<Vec<SearchResult>, Box<dyn Error>> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let results = response
        .news_results
        .into_iter()
        .filter_map(|entry| {
            if entry.link.is_empty() {
                warn!(title = %entry.title, "Skipping search result without a link");
                return None;
            }
            Some(SearchResult {
                title: entry.title,
                link: entry.link,
                source: entry.source.into_name(),
            })
        })
        .collect();

    Ok(results)
}
