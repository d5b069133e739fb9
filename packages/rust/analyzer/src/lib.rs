//! LLM-backed editorial analysis of extracted documentation text.
//!
//! [`Analyzer::analyze`] never fails: every failure path yields a degraded
//! [`CriteriaReport`] whose four criteria carry a placeholder assessment and
//! no suggestions.

pub mod client;
pub mod prompt;

use tracing::{info, instrument, warn};

use docreview_shared::{CriteriaReport, DocReviewError, Result};

pub use client::{ChatClient, ChatMessage, LlmHandle};
pub use prompt::{SYSTEM_PROMPT, build_prompt};

/// Why a degraded report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// No LLM client was constructed.
    ClientUnavailable,
    /// The LLM output was not the four-criterion JSON object.
    DecodeError,
    /// Any other invocation failure.
    AnalysisError,
}

impl Degradation {
    /// Placeholder assessment written into every criterion.
    pub fn assessment(&self) -> &'static str {
        match self {
            Self::ClientUnavailable => "LLM client not initialized.",
            Self::DecodeError => "JSON decode error.",
            Self::AnalysisError => "Error during analysis.",
        }
    }

    /// The degraded four-criterion report.
    pub fn report(&self) -> CriteriaReport {
        CriteriaReport::degraded(self.assessment())
    }
}

/// Runs the four-criterion review against an owned LLM handle.
#[derive(Debug)]
pub struct Analyzer {
    llm: LlmHandle,
}

impl Analyzer {
    pub fn new(llm: LlmHandle) -> Self {
        Self { llm }
    }

    /// Whether a client is available.
    pub fn is_available(&self) -> bool {
        self.llm.is_ready()
    }

    /// Analyze `content`, degrading on any failure.
    #[instrument(skip_all, fields(content_len = content.len()))]
    pub async fn analyze(&self, content: &str) -> CriteriaReport {
        let client = match &self.llm {
            LlmHandle::Ready(client) => client,
            LlmHandle::Unavailable { reason } => {
                warn!(reason, "LLM client not initialized, skipping analysis");
                return Degradation::ClientUnavailable.report();
            }
        };

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(content)),
        ];

        let raw = match client.complete_json(&messages).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "error during LLM analysis");
                return Degradation::AnalysisError.report();
            }
        };

        match parse_report(&raw) {
            Ok(report) => {
                info!(suggestions = report.suggestion_count(), "analysis complete");
                report
            }
            Err(e) => {
                warn!(error = %e, raw_output = %raw, "error decoding JSON from LLM");
                Degradation::DecodeError.report()
            }
        }
    }
}

/// Decode raw LLM output into the four-criterion report.
pub fn parse_report(raw: &str) -> Result<CriteriaReport> {
    serde_json::from_str(raw).map_err(|e| DocReviewError::parse(format!("LLM output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docreview_shared::{CriterionKey, LlmSettings};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_REPORT: &str = r#"{
        "readability_for_marketer": {"assessment": "Mostly clear.", "suggestions": ["Define 'creative' up front."]},
        "structure_and_flow": {"assessment": "Logical.", "suggestions": []},
        "completeness_and_examples": {"assessment": "Lacks examples.", "suggestions": ["Add a sample image.", "Show a finished creative."]},
        "style_guidelines": {"assessment": "Concise.", "suggestions": ["Use active voice in step 2."]}
    }"#;

    async fn analyzer_with_reply(server: &MockServer, reply: ResponseTemplate) -> Analyzer {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(reply)
            .mount(server)
            .await;

        let settings = LlmSettings {
            api_key: "sk-test".into(),
            model: "gpt-4o".into(),
            base_url: server.uri(),
            temperature: 0.7,
            timeout: None,
        };
        Analyzer::new(LlmHandle::connect(settings))
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    fn assert_degraded(report: &CriteriaReport, reason: Degradation) {
        for (_, criterion) in report.iter() {
            assert_eq!(criterion.assessment, reason.assessment());
            assert!(criterion.suggestions.is_empty());
        }
    }

    #[tokio::test]
    async fn unavailable_client_degrades() {
        let analyzer = Analyzer::new(LlmHandle::unavailable("construction failed"));
        assert!(!analyzer.is_available());
        let report = analyzer.analyze("Some article").await;
        assert_degraded(&report, Degradation::ClientUnavailable);
        assert_eq!(report.iter().count(), 4);
    }

    #[tokio::test]
    async fn valid_json_is_parsed() {
        let server = MockServer::start().await;
        let analyzer = analyzer_with_reply(&server, completion(VALID_REPORT)).await;

        let report = analyzer.analyze("Create creatives\nUpload an image.").await;
        assert_eq!(report.readability_for_marketer.assessment, "Mostly clear.");
        assert_eq!(report.completeness_and_examples.suggestions.len(), 2);
        assert_eq!(report.suggestion_count(), 4);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let user_prompt = body["messages"][1]["content"].as_str().unwrap();
        assert!(user_prompt.contains("Create creatives\nUpload an image."));
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn malformed_json_degrades_to_decode_error() {
        let server = MockServer::start().await;
        let analyzer = analyzer_with_reply(&server, completion("Sure! Here is my review: {")).await;

        let report = analyzer.analyze("text").await;
        assert_degraded(&report, Degradation::DecodeError);
    }

    #[tokio::test]
    async fn wrong_shape_degrades_to_decode_error() {
        let server = MockServer::start().await;
        let analyzer =
            analyzer_with_reply(&server, completion(r#"{"summary": "looks fine"}"#)).await;

        let report = analyzer.analyze("text").await;
        assert_degraded(&report, Degradation::DecodeError);
    }

    #[tokio::test]
    async fn api_failure_degrades_to_analysis_error() {
        let server = MockServer::start().await;
        let analyzer = analyzer_with_reply(
            &server,
            ResponseTemplate::new(429).set_body_string("rate limited"),
        )
        .await;

        let report = analyzer.analyze("text").await;
        assert_degraded(&report, Degradation::AnalysisError);
        // single shot: no retry after a rate limit
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades_to_analysis_error() {
        let settings = LlmSettings {
            api_key: "sk-test".into(),
            model: "gpt-4o".into(),
            base_url: "http://127.0.0.1:9".into(),
            temperature: 0.7,
            timeout: None,
        };
        let analyzer = Analyzer::new(LlmHandle::connect(settings));
        let report = analyzer.analyze("text").await;
        assert_degraded(&report, Degradation::AnalysisError);
    }

    #[test]
    fn parse_report_ignores_extra_keys() {
        let raw = VALID_REPORT.replacen('{', r#"{"overall": "good","#, 1);
        let report = parse_report(&raw).unwrap();
        assert_eq!(report.get(CriterionKey::StyleGuidelines).assessment, "Concise.");
    }

    #[test]
    fn parse_report_error_is_parse_variant() {
        assert!(parse_report("not json").unwrap_err().is_parse());
    }
}
