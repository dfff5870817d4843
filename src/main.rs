//! # News Research Assistant
//!
//! A single-session research tool: search for news articles matching a
//! keyword, scrape each article's title/image/text, optionally summarize it
//! with a language model, browse the results in a small web UI, and export
//! them as a CSV spreadsheet.
//!
//! ## Usage
//!
//! ```sh
//! SERPAPI_KEY=... news_research --bind 127.0.0.1:8080
//! ```
//!
//! ## Architecture
//!
//! Each search runs a four-stage sequential pipeline:
//! 1. **Search**: send the keyword to the news-search service (10 results)
//! 2. **Extraction**: fetch and parse each article page (title/image/text)
//! 3. **Summarization**: one gated, deterministic model call per article,
//!    or a plain excerpt when summaries are toggled off
//! 4. **Presentation/export**: result cards, a tabular preview, and a CSV
//!    download named after the keyword
//!
//! Articles are processed strictly one after another; failures per article
//! degrade to visible placeholder rows instead of aborting the run.

use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::error::Error;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod export;
mod extract;
mod models;
mod search;
mod server;
mod summarize;
mod utils;

use cli::Cli;
use config::AppConfig;
use extract::Extractor;
use models::RunState;
use search::SearchClient;
use server::AppState;
use summarize::{ChatCompletionsBackend, Summarizer};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("news_research starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.bind, ?args.config, "Parsed CLI arguments");

    // --- Configuration ---
    let config = AppConfig::load(args.config.as_deref())?
        .with_overrides(args.serpapi_key, args.summarizer_api_key);

    let search_key = match config.require_search_key() {
        Ok(key) => key,
        Err(e) => {
            error!(error = %e, "Cannot start without a search credential");
            return Err(e);
        }
    };

    // --- Long-lived pipeline resources, constructed once ---
    let search = SearchClient::new(config.search.endpoint.clone(), search_key)?;
    info!(endpoint = %config.search.endpoint, "Search client initialized");

    let extractor = Extractor::new()?;

    let backend = ChatCompletionsBackend::new(&config.summarizer)?;
    let summarizer = Summarizer::new(backend);
    info!(
        api_base = %config.summarizer.api_base,
        model = %config.summarizer.model,
        "Summarization backend initialized"
    );

    let state = web::Data::new(AppState {
        search,
        extractor,
        summarizer,
        last_run: Mutex::new(RunState::Idle),
    });

    info!(bind = %args.bind, "Starting web UI");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(server::configure))
        .bind(args.bind.as_str())?
        .run()
        .await?;

    info!("Shutdown complete");
    Ok(())
}
