//! Article page extraction: title, leading image, and plain text.
//!
//! The extraction stage downloads each result URL and pulls structured
//! content out of the page markup:
//!
//! - **title**: `og:title` meta tag, then `<title>`, then the first `<h1>`
//! - **image**: `og:image`, then `twitter:image`, then `link[rel=image_src]`,
//!   resolved against the page URL when relative
//! - **text**: paragraphs inside `<article>`, falling back to all `<p>`
//!   elements, capped at 5000 characters to bound downstream cost
//!
//! Extraction never aborts the run. Any failure (transport error, bad
//! status, a page with no recognizable content) produces
//! [`Extraction::Failed`], which the caller renders as a visible error row.
//!
//! Fetching is async; parsing is a synchronous pure function over the body
//! so it can be tested without a network.

use crate::models::{ExtractedArticle, Extraction};
use crate::utils::{collapse_whitespace, truncate_chars};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Cap applied to extracted article text.
pub const MAX_TEXT_CHARS: usize = 5000;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static PAGE_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static TWITTER_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="twitter:image"]"#).unwrap());
static LINK_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="image_src"]"#).unwrap());
static ARTICLE_P: Lazy<Selector> = Lazy::new(|| Selector::parse("article p").unwrap());
static ANY_P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Downloads article pages and extracts their content.
///
/// Owns a single `reqwest::Client` with a browser-like User-Agent and an
/// explicit timeout, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Extractor {
    client: reqwest::Client,
}

impl Extractor {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page and extract its article content.
    ///
    /// Always returns an [`Extraction`]; failures carry the error
    /// description instead of propagating.
    #[instrument(level = "info", skip(self), fields(%url))]
    pub async fn extract(&self, url: &str) -> Extraction {
        match self.fetch(url).await {
            Ok(body) => {
                debug!(bytes = body.len(), "Fetched article page");
                parse_article(&body, url)
            }
            Err(e) => {
                warn!(error = %e, "Article fetch failed");
                Extraction::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("article fetch failed with status {status}").into());
        }
        Ok(response.text().await?)
    }
}

/// Parse a fetched page into structured article content.
///
/// Returns [`Extraction::Failed`] when the page yields neither a title nor
/// any paragraph text; partial pages (title only, text only) still succeed.
pub(crate) fn parse_article(body: &str, url: &str) -> Extraction {
    let document = Html::parse_document(body);

    let title = extract_title(&document);
    let text = extract_text(&document);
    let image = extract_image(&document, url);

    if title.is_empty() && text.is_empty() {
        return Extraction::Failed {
            error: "no article content found in page".to_string(),
        };
    }

    Extraction::Article(ExtractedArticle { title, image, text })
}

fn extract_title(document: &Html) -> String {
    if let Some(meta) = document.select(&OG_TITLE).next() {
        if let Some(content) = meta.value().attr("content") {
            let title = collapse_whitespace(content);
            if !title.is_empty() {
                return title;
            }
        }
    }

    if let Some(el) = document.select(&PAGE_TITLE).next() {
        let title = collapse_whitespace(&el.text().collect::<String>());
        if !title.is_empty() {
            return title;
        }
    }

    document
        .select(&H1)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn extract_text(document: &Html) -> String {
    let mut paragraphs: Vec<String> = document
        .select(&ARTICLE_P)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.is_empty() {
        paragraphs = document
            .select(&ANY_P)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .collect();
    }

    truncate_chars(&paragraphs.join("\n\n"), MAX_TEXT_CHARS)
}

fn extract_image(document: &Html, url: &str) -> Option<String> {
    let candidate = document
        .select(&OG_IMAGE)
        .next()
        .and_then(|el| el.value().attr("content"))
        .or_else(|| {
            document
                .select(&TWITTER_IMAGE)
                .next()
                .and_then(|el| el.value().attr("content"))
        })
        .or_else(|| {
            document
                .select(&LINK_IMAGE)
                .next()
                .and_then(|el| el.value().attr("href"))
        })?;

    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    // Resolve relative image URLs against the page URL.
    match Url::parse(url).and_then(|base| base.join(candidate)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Url::parse(candidate).ok().map(|u| u.to_string()),
    }
}
