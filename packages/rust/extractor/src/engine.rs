//! Page fetching and content extraction.
//!
//! The extractor issues one GET per URL with a bounded timeout, parses the
//! body, and hands the document to the selector strategies. Failures never
//! escape [`Extractor::fetch`]; they are logged and reported as empty text.

use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use tracing::{debug, instrument, warn};
use url::Url;

use docreview_shared::{DocReviewError, ExtractConfig, Result};

use crate::text::{self, Extraction};

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("DocReview/", env!("CARGO_PKG_VERSION"));

/// Fetches help-center pages and extracts their article text.
pub struct Extractor {
    client: Client,
    timeout: Duration,
}

impl Extractor {
    /// Create an extractor with the configured request timeout.
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| DocReviewError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Fetch `url` and return its article text.
    ///
    /// Returns an empty string on any failure; the cause is logged.
    pub async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => text,
            Err(DocReviewError::Timeout(_)) => {
                warn!(url, "error fetching page: request timed out");
                String::new()
            }
            Err(e @ DocReviewError::Parse { .. }) => {
                warn!(url, error = %e, "error parsing page content");
                String::new()
            }
            Err(e) => {
                warn!(url, error = %e, "error fetching page");
                String::new()
            }
        }
    }

    /// Fetch `url` and return its article text, surfacing the failure cause.
    #[instrument(skip(self), fields(timeout_ms = self.timeout.as_millis() as u64))]
    pub async fn try_fetch(&self, url: &str) -> Result<String> {
        let body = self.get_body(url).await?;
        let extraction = extract_document(&body)?;

        match extraction.strategy {
            Some(strategy) => debug!(strategy = strategy.name(), "content container found"),
            None => warn!(url, "no article container found, extracting body text"),
        }

        Ok(extraction.text)
    }

    async fn get_body(&self, url: &str) -> Result<String> {
        let parsed =
            Url::parse(url).map_err(|e| DocReviewError::Network(format!("{url}: invalid URL: {e}")))?;

        debug!(%parsed, "fetching page");

        let response = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocReviewError::Network(format!("{url}: HTTP {status}")));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                DocReviewError::Timeout(url.to_string())
            } else {
                DocReviewError::parse(format!("{url}: body read failed: {e}"))
            }
        })
    }
}

/// Parse a raw HTML body and extract its article text.
pub fn extract_document(body: &str) -> Result<Extraction> {
    let doc = Html::parse_document(body);
    text::extract(&doc)
}

fn classify(url: &str, e: reqwest::Error) -> DocReviewError {
    if e.is_timeout() {
        DocReviewError::Timeout(url.to_string())
    } else {
        DocReviewError::Network(format!("{url}: {e}"))
    }
}
