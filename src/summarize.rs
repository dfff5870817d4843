//! Summarization stage: gated, deterministic model calls with defined fallbacks.
//!
//! The stage is a thin layer of gates in front of one model invocation:
//!
//! - toggle off: the first 500 characters of the raw text, no model call
//! - fewer than 50 words: `"Text too short to summarize."`, no model call
//! - otherwise: exactly one call to an OpenAI-compatible chat-completions
//!   endpoint with greedy decoding; any failure yields `"Summary unavailable."`
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`Complete`]: core trait for a single text-to-summary model call
//! - [`ChatCompletionsBackend`]: reqwest implementation against the API
//! - [`Summarizer`]: the gates, generic over any `Complete` backend so the
//!   never-calls-the-model properties are testable with a counting mock
//!
//! The backend is constructed once at startup and shared for the process
//! lifetime; summarization failures never abort a run. There is no retry
//! logic anywhere in this stage.

use crate::config::SummarizerConfig;
use crate::utils::{truncate_chars, word_count};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Returned verbatim when the input has fewer than 50 words.
pub const TOO_SHORT_MESSAGE: &str = "Text too short to summarize.";
/// Returned verbatim when the model call fails.
pub const UNAVAILABLE_MESSAGE: &str = "Summary unavailable.";

/// Inputs below this word count are never sent to the model.
pub const MIN_INPUT_WORDS: usize = 50;
/// Characters of raw text shown when summarization is toggled off.
pub const EXCERPT_CHARS: usize = 500;

/// Generation bound: maximum tokens in the summary.
const MAX_SUMMARY_TOKENS: u32 = 130;
/// Generation bound: the prompt demands at least this many words.
const MIN_SUMMARY_WORDS: usize = 30;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for a single summarization model call.
///
/// Implementors send article text to a model and return its summary.
/// The gates in [`Summarizer`] sit in front of this seam.
pub trait Complete {
    /// Send text to the model and receive a summary.
    async fn complete(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// Tagged outcome of the summarization stage.
///
/// The caller branches on the variant explicitly; [`Summary::into_text`]
/// flattens it to the display string, including the fixed placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// The model produced a summary.
    Generated(String),
    /// Summarization was toggled off; carries the raw-text excerpt.
    Excerpt(String),
    /// The input was below the word-count gate.
    TooShort,
    /// The model call failed.
    Unavailable,
}

impl Summary {
    /// Flatten the outcome into the text shown on the card and exported.
    pub fn into_text(self) -> String {
        match self {
            Summary::Generated(text) | Summary::Excerpt(text) => text,
            Summary::TooShort => TOO_SHORT_MESSAGE.to_string(),
            Summary::Unavailable => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// The summarization gates, generic over the model backend.
#[derive(Debug)]
pub struct Summarizer<B> {
    backend: B,
}

impl<B> Summarizer<B>
where
    B: Complete,
{
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Produce the summary text for one article.
    ///
    /// Follows the stage contract in order: excerpt when toggled off,
    /// word-count gate, then exactly one model attempt.
    #[instrument(level = "info", skip_all, fields(words = word_count(text), use_summary = use_summary))]
    pub async fn run(&self, text: &str, use_summary: bool) -> Summary {
        if !use_summary {
            return Summary::Excerpt(truncate_chars(text, EXCERPT_CHARS));
        }

        if word_count(text) < MIN_INPUT_WORDS {
            return Summary::TooShort;
        }

        let t0 = Instant::now();
        match self.backend.complete(text).await {
            Ok(summary) => {
                let summary = summary.trim().to_string();
                if summary.is_empty() {
                    warn!("Model returned an empty summary; substituting placeholder");
                    return Summary::Unavailable;
                }
                info!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    chars = summary.len(),
                    "Generated summary"
                );
                Summary::Generated(summary)
            }
            Err(e) => {
                warn!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %e,
                    "Summarization failed; substituting placeholder"
                );
                Summary::Unavailable
            }
        }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Backend that calls an OpenAI-compatible `/chat/completions` endpoint.
///
/// Decoding is deterministic (`temperature: 0.0`) and output is bounded to
/// [`MAX_SUMMARY_TOKENS`]; the prompt demands at least [`MIN_SUMMARY_WORDS`]
/// words.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl std::fmt::Debug for ChatCompletionsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsBackend")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ChatCompletionsBackend {
    pub fn new(config: &SummarizerConfig) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl Complete for ChatCompletionsBackend {
    async fn complete(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: format!(
                    "Summarize the following news article in at least {MIN_SUMMARY_WORDS} words. \
                     Respond with only the summary.\n\n{text}"
                ),
            }],
            max_tokens: MAX_SUMMARY_TOKENS,
            temperature: 0.0,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("summarization API returned status {status}").into());
        }

        let response: ChatResponse = response.json().await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or("summarization API returned no choices")?;
        Ok(choice.message.content)
    }
}
