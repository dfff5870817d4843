//! Data models for search results, extracted articles, and processed records.
//!
//! This module defines the core data structures flowing through the pipeline:
//! - [`SearchResult`]: One entry returned by the news-search service
//! - [`Extraction`] / [`ExtractedArticle`]: Tagged outcome of scraping a page
//! - [`ArticleRecord`]: The merged, display-ready unit (one UI card, one CSV row)
//! - [`ResearchRun`] / [`RunState`]: The per-run state machine held by the server
//!
//! Extraction failures are data, not errors: a failed fetch becomes a
//! well-defined fallback article so the run always continues.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Title substituted when an article page could not be fetched or parsed.
pub const ERROR_FETCHING_TITLE: &str = "Error fetching article";

/// One entry returned by the news-search service, prior to content extraction.
///
/// # Fields
///
/// * `title` - The headline as reported by the search service
/// * `link` - Absolute URL of the article page
/// * `source` - Publisher name as reported by the search service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    /// The headline shown on the result card.
    pub title: String,
    /// The article URL, fetched by the extraction stage.
    pub link: String,
    /// The publisher label.
    pub source: String,
}

/// Structured content extracted from an article page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedArticle {
    /// The article's own title as found in the page markup.
    pub title: String,
    /// The leading image URL, when one was found.
    pub image: Option<String>,
    /// Plain article text, capped at 5000 characters.
    pub text: String,
}

/// Tagged outcome of the extraction stage.
///
/// Extraction never aborts the run: the caller branches explicitly on
/// success versus the defined fallback instead of catching errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The page was fetched and parsed.
    Article(ExtractedArticle),
    /// The fetch or parse failed; carries a human-readable description.
    Failed { error: String },
}

impl Extraction {
    /// Resolve the outcome into a displayable article.
    ///
    /// A failure becomes the sentinel article: the fixed error title, no
    /// image, and the error description as the text. The description still
    /// flows through the summarization stage, exactly like real text.
    pub fn resolve(self) -> ExtractedArticle {
        match self {
            Extraction::Article(article) => article,
            Extraction::Failed { error } => ExtractedArticle {
                title: ERROR_FETCHING_TITLE.to_string(),
                image: None,
                text: error,
            },
        }
    }
}

/// The merged, display-ready unit combining search metadata with
/// extracted and summarized content.
///
/// One `ArticleRecord` backs one UI card and one CSV row. The card heading
/// shows the search-service headline; the exported `Title` column carries
/// the title extracted from the page itself (or the error sentinel).
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    /// Search-result headline, rendered as the card heading.
    pub headline: String,
    /// Extracted article title, exported in the `Title` column.
    pub title: String,
    /// Publisher label from the search result.
    pub source: String,
    /// The article URL.
    pub url: String,
    /// Summary text, excerpt, or one of the fixed placeholder strings.
    pub summary: String,
    /// Leading image URL; `None` renders as the placeholder image and
    /// exports as an empty field.
    pub image: Option<String>,
}

impl ArticleRecord {
    /// Merge a search result with extraction and summarization output.
    pub fn merge(result: &SearchResult, article: ExtractedArticle, summary: String) -> Self {
        Self {
            headline: result.title.clone(),
            title: article.title,
            source: result.source.clone(),
            url: result.link.clone(),
            summary,
            image: article.image,
        }
    }
}

/// A completed research run, kept in memory until the next search.
#[derive(Debug, Clone)]
pub struct ResearchRun {
    /// The keyword that produced this run; also drives the export filename.
    pub keyword: String,
    /// Whether model summaries were requested for this run.
    pub use_summary: bool,
    /// Processed records in arrival order; never reordered or deduplicated.
    pub records: Vec<ArticleRecord>,
    /// When processing finished.
    pub completed_at: DateTime<Local>,
}

/// Per-run state machine held by the server.
///
/// Every new search replaces the whole state, discarding the prior run.
/// Only `Ready` offers an export.
#[derive(Debug, Clone)]
pub enum RunState {
    /// No search has happened yet.
    Idle,
    /// The search service returned zero results.
    NoResults { keyword: String },
    /// The search call itself failed; the run terminated before processing.
    SearchFailed { keyword: String, reason: String },
    /// All results were processed; the run can be exported.
    Ready(ResearchRun),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SearchResult {
        SearchResult {
            title: "Acme sued over rocket skates".to_string(),
            link: "https://news.example.com/acme".to_string(),
            source: "Example News".to_string(),
        }
    }

    #[test]
    fn test_extraction_resolve_success_passes_through() {
        let article = ExtractedArticle {
            title: "Acme Corp Lawsuit Filed".to_string(),
            image: Some("https://news.example.com/acme.jpg".to_string()),
            text: "Body text".to_string(),
        };
        assert_eq!(Extraction::Article(article.clone()).resolve(), article);
    }

    #[test]
    fn test_extraction_resolve_failure_is_sentinel() {
        let resolved = Extraction::Failed {
            error: "connection timed out".to_string(),
        }
        .resolve();

        assert_eq!(resolved.title, ERROR_FETCHING_TITLE);
        assert_eq!(resolved.image, None);
        assert_eq!(resolved.text, "connection timed out");
    }

    #[test]
    fn test_merge_keeps_both_titles() {
        let article = ExtractedArticle {
            title: "Acme Corp Lawsuit Filed".to_string(),
            image: None,
            text: "Body".to_string(),
        };
        let record = ArticleRecord::merge(&sample_result(), article, "A summary.".to_string());

        assert_eq!(record.headline, "Acme sued over rocket skates");
        assert_eq!(record.title, "Acme Corp Lawsuit Filed");
        assert_eq!(record.source, "Example News");
        assert_eq!(record.url, "https://news.example.com/acme");
        assert_eq!(record.summary, "A summary.");
        assert_eq!(record.image, None);
    }

    #[test]
    fn test_merge_of_failed_extraction() {
        let failed = Extraction::Failed {
            error: "404 Not Found".to_string(),
        };
        let record =
            ArticleRecord::merge(&sample_result(), failed.resolve(), "404 Not Found".to_string());

        assert_eq!(record.title, ERROR_FETCHING_TITLE);
        assert_eq!(record.image, None);
        // the card still shows the search headline
        assert_eq!(record.headline, "Acme sued over rocket skates");
    }

    #[test]
    fn test_search_result_deserializes() {
        let json = r#"{
            "title": "Headline",
            "link": "https://example.com/a",
            "source": "Example"
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.title, "Headline");
        assert_eq!(result.source, "Example");
    }
}
