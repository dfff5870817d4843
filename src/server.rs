//! Web UI: actix handlers, shared state, and the per-run pipeline.
//!
//! Three routes implement the whole surface:
//!
//! - `GET /`: the search form
//! - `POST /search`: runs the pipeline sequentially inside the request
//!   (search, then per-article extract and summarize), stores the outcome,
//!   and renders the result cards plus the tabular preview
//! - `GET /export`: serves the CSV of the last completed run
//!
//! Each search replaces the shared [`RunState`] wholesale, so a new run
//! always discards the previous one. The pipeline blocks the request while
//! it works; there is no cancellation mid-run.

use crate::export;
use crate::extract::Extractor;
use crate::models::{ArticleRecord, ResearchRun, RunState};
use crate::search::SearchClient;
use crate::summarize::{ChatCompletionsBackend, Summarizer};
use crate::utils::export_filename;
use actix_web::{get, post, web, HttpResponse, Responder};
use askama::Template;
use chrono::Local;
use serde::Deserialize;
use std::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Long-lived resources plus the last run, shared across workers.
pub struct AppState {
    pub search: SearchClient,
    pub extractor: Extractor,
    pub summarizer: Summarizer<ChatCompletionsBackend>,
    pub last_run: Mutex<RunState>,
}

/// Register all routes on the actix app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(run_search).service(export_csv);
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    keyword: String,
    use_summary: bool,
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate {
    keyword: String,
    use_summary: bool,
    /// Set when the search call itself failed.
    error: Option<String>,
    /// Empty together with `error == None` means zero search results.
    records: Vec<ArticleRecord>,
    completed_at: String,
    export_filename: String,
}

/// Form payload of `POST /search`. The checkbox field is only present when
/// checked, browser-style.
#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    use_summary: Option<String>,
}

fn render<T: Template>(template: T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            HttpResponse::InternalServerError().body("Template rendering failed.")
        }
    }
}

#[get("/")]
async fn index() -> impl Responder {
    render(IndexTemplate {
        keyword: String::new(),
        use_summary: true,
    })
}

#[post("/search")]
async fn run_search(form: web::Form<SearchForm>, state: web::Data<AppState>) -> impl Responder {
    let keyword = form.keyword.trim().to_string();
    let use_summary = form.use_summary.is_some();

    // An empty keyword just re-renders the form.
    if keyword.is_empty() {
        return render(IndexTemplate {
            keyword,
            use_summary,
        });
    }

    let outcome = run_pipeline(&state, &keyword, use_summary).await;
    *state.last_run.lock().unwrap() = outcome.clone();

    render(results_template(outcome, use_summary))
}

#[get("/export")]
async fn export_csv(state: web::Data<AppState>) -> impl Responder {
    let guard = state.last_run.lock().unwrap();
    let run = match &*guard {
        RunState::Ready(run) => run,
        _ => return HttpResponse::NotFound().body("No completed search to export yet."),
    };

    match export::to_csv(&run.records) {
        Ok(csv) => {
            let filename = export_filename(&run.keyword);
            info!(%filename, rows = run.records.len(), "Serving CSV export");
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .append_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(csv)
        }
        Err(e) => {
            error!(error = %e, "CSV serialization failed");
            HttpResponse::InternalServerError().body("Failed to build CSV export.")
        }
    }
}

/// Run the whole pipeline for one keyword.
///
/// Articles are processed strictly one after another in arrival order:
/// extract, summarize, merge. Per-article failures degrade into their
/// defined fallbacks; only the search call can terminate the run early.
#[instrument(level = "info", skip(state))]
async fn run_pipeline(state: &AppState, keyword: &str, use_summary: bool) -> RunState {
    let results = match state.search.search_news(keyword).await {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, keyword, "Search request failed; run terminated");
            return RunState::SearchFailed {
                keyword: keyword.to_string(),
                reason: e.to_string(),
            };
        }
    };

    if results.is_empty() {
        info!(keyword, "Search returned no results");
        return RunState::NoResults {
            keyword: keyword.to_string(),
        };
    }

    info!(count = results.len(), keyword, "Processing search results");

    let mut records = Vec::with_capacity(results.len());
    for (i, result) in results.iter().enumerate() {
        debug!(index = i, url = %result.link, "Extracting article");
        let article = state.extractor.extract(&result.link).await.resolve();
        let summary = state
            .summarizer
            .run(&article.text, use_summary)
            .await
            .into_text();
        records.push(ArticleRecord::merge(result, article, summary));
    }

    info!(count = records.len(), keyword, "Run completed");
    RunState::Ready(ResearchRun {
        keyword: keyword.to_string(),
        use_summary,
        records,
        completed_at: Local::now(),
    })
}

fn results_template(outcome: RunState, use_summary: bool) -> ResultsTemplate {
    match outcome {
        RunState::Ready(run) => ResultsTemplate {
            keyword: run.keyword.clone(),
            use_summary: run.use_summary,
            error: None,
            completed_at: run.completed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            export_filename: export_filename(&run.keyword),
            records: run.records,
        },
        RunState::NoResults { keyword } => ResultsTemplate {
            keyword,
            use_summary,
            error: None,
            records: Vec::new(),
            completed_at: String::new(),
            export_filename: String::new(),
        },
        RunState::SearchFailed { keyword, reason } => ResultsTemplate {
            keyword,
            use_summary,
            error: Some(reason),
            records: Vec::new(),
            completed_at: String::new(),
            export_filename: String::new(),
        },
        // run_pipeline never returns Idle; render it as an empty form state
        RunState::Idle => ResultsTemplate {
            keyword: String::new(),
            use_summary,
            error: None,
            records: Vec::new(),
            completed_at: String::new(),
            export_filename: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerConfig;
    use actix_web::{test, App};

    fn record(n: usize, image: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            headline: format!("Headline {n}"),
            title: format!("Title {n}"),
            source: "Example News".to_string(),
            url: format!("https://example.com/{n}"),
            summary: format!("Summary {n}"),
            image: image.map(str::to_string),
        }
    }

    fn test_state() -> web::Data<AppState> {
        let search =
            SearchClient::new("https://serpapi.invalid/search".to_string(), "k".to_string())
                .unwrap();
        let extractor = Extractor::new().unwrap();
        let backend = ChatCompletionsBackend::new(&SummarizerConfig::default()).unwrap();
        web::Data::new(AppState {
            search,
            extractor,
            summarizer: Summarizer::new(backend),
            last_run: Mutex::new(RunState::Idle),
        })
    }

    #[actix_web::test]
    async fn test_index_renders_form() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Search Now"));
        assert!(body.contains("checked"));
    }

    #[actix_web::test]
    async fn test_export_before_any_run_is_404() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure)).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/export").to_request()).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_export_of_ready_run() {
        let state = test_state();
        *state.last_run.lock().unwrap() = RunState::Ready(ResearchRun {
            keyword: "Acme Corp Lawsuit".to_string(),
            use_summary: true,
            records: vec![record(1, None), record(2, None), record(3, None)],
            completed_at: Local::now(),
        });

        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/export").to_request()).await;

        assert!(resp.status().is_success());
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("Acme_Corp_Lawsuit_news.csv"));

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert_eq!(body.lines().count(), 4);
        assert_eq!(body.lines().next().unwrap(), "Title,Source,URL,Summary,Image");
    }

    #[core::prelude::v1::test]
    fn test_no_results_template() {
        let template = results_template(
            RunState::NoResults {
                keyword: "XYZ".to_string(),
            },
            true,
        );
        let html = template.render().unwrap();

        assert!(html.contains("No results found. Try different keywords."));
        assert!(!html.contains("<table"));
        assert!(!html.contains("Download Results as CSV"));
    }

    #[core::prelude::v1::test]
    fn test_search_failed_template() {
        let template = results_template(
            RunState::SearchFailed {
                keyword: "XYZ".to_string(),
                reason: "search service returned status 429".to_string(),
            },
            true,
        );
        let html = template.render().unwrap();

        assert!(html.contains("search service returned status 429"));
        assert!(!html.contains("Download Results as CSV"));
    }

    #[core::prelude::v1::test]
    fn test_ready_template_renders_cards_and_table() {
        let run = ResearchRun {
            keyword: "Acme Corp Lawsuit".to_string(),
            use_summary: true,
            records: vec![
                record(1, Some("https://example.com/1.jpg")),
                record(2, None),
                record(3, None),
            ],
            completed_at: Local::now(),
        };
        let html = results_template(RunState::Ready(run), true).render().unwrap();

        assert!(html.contains("Found 3 results."));
        assert_eq!(html.matches("class=\"card\"").count(), 3);
        assert!(html.contains("https://example.com/1.jpg"));
        // records without an image fall back to the placeholder
        assert!(html.contains("https://via.placeholder.com/400x200?text=No+Image"));
        assert!(html.contains("<table"));
        assert!(html.contains("Download Results as CSV"));
        assert!(html.contains("Acme_Corp_Lawsuit_news.csv"));
    }
}
