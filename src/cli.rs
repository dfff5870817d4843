//! Command-line interface definitions for the news research assistant.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials can be provided via command-line flags or environment
//! variables; they override values from the config file.

use clap::Parser;

/// Command-line arguments for the news research assistant.
///
/// # Examples
///
/// ```sh
/// # Run with the key from the environment
/// SERPAPI_KEY=... news_research
///
/// # Explicit config file and bind address
/// news_research -c ./config.yaml --bind 0.0.0.0:8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address the web UI listens on
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Search service API key
    #[arg(long, env = "SERPAPI_KEY")]
    pub serpapi_key: Option<String>,

    /// Summarization API key (only needed when the endpoint requires one)
    #[arg(long, env = "SUMMARIZER_API_KEY")]
    pub summarizer_api_key: Option<String>,
}
