//! OpenAI-compatible chat-completions client.
//!
//! One request per call, JSON-object response mode, no retries.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use docreview_shared::{DocReviewError, LlmSettings, Result};

/// User-Agent string for LLM requests.
const USER_AGENT: &str = concat!("DocReview/", env!("CARGO_PKG_VERSION"));

/// Maximum number of error-body bytes kept in error messages.
const ERROR_BODY_LIMIT: usize = 500;

// ---------------------------------------------------------------------------
// Protocol types
// ---------------------------------------------------------------------------

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// ChatClient
// ---------------------------------------------------------------------------

/// Owned connection to the chat-completions endpoint.
pub struct ChatClient {
    http: Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatClient {
    /// Build a client from resolved settings.
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DocReviewError::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, settings })
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Send `messages` in JSON-object mode and return the raw message content.
    #[instrument(skip_all, fields(model = %self.settings.model))]
    pub async fn complete_json(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: self.settings.temperature,
        };

        debug!(%url, messages = messages.len(), "sending chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DocReviewError::Timeout(url.clone())
                } else {
                    DocReviewError::Network(format!("{url}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate(&body, ERROR_BODY_LIMIT);
            return Err(DocReviewError::Llm(format!("HTTP {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| DocReviewError::Llm(format!("malformed API response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DocReviewError::Llm("response contained no choices".into()))?
            .message
            .content
            .ok_or_else(|| DocReviewError::Llm("response message has no content".into()))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ---------------------------------------------------------------------------
// LlmHandle
// ---------------------------------------------------------------------------

/// The analyzer's LLM connection: ready, or failed at construction.
#[derive(Debug)]
pub enum LlmHandle {
    Ready(ChatClient),
    Unavailable { reason: String },
}

impl LlmHandle {
    /// Construct the client, recording construction failure instead of returning it.
    pub fn connect(settings: LlmSettings) -> Self {
        match ChatClient::new(settings) {
            Ok(client) => {
                info!(model = client.model(), "LLM client initialized");
                Self::Ready(client)
            }
            Err(e) => {
                error!(error = %e, "error initializing LLM client");
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// A handle with no client.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
