//! End-to-end batch runs: URLs → extracted articles → analysis reports.
//!
//! Both runs are sequential: each URL is fully handled before the next one
//! starts. Per-URL failures become placeholder entries, so the output always
//! holds one entry per input URL. Output is written once, at the end.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use docreview_analyzer::Analyzer;
use docreview_extractor::Extractor;
use docreview_shared::{AnalysisReport, ExtractConfig, ExtractedArticle, Result};

use crate::store;

/// Number of characters of extracted text shown in progress logs.
const PREVIEW_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a page's content has been extracted (or failed to).
    fn page_extracted(&self, url: &str, current: usize, total: usize);
    /// Called after a page's report has been produced.
    fn page_analyzed(&self, report: &AnalysisReport, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, summary: &BatchSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_extracted(&self, _url: &str, _current: usize, _total: usize) {}
    fn page_analyzed(&self, _report: &AnalysisReport, _current: usize, _total: usize) {}
    fn done(&self, _summary: &BatchSummary) {}
}

/// Summary of a completed batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Entries written to the output file.
    pub total: usize,
    /// Entries without an error marker.
    pub succeeded: usize,
    /// Entries carrying an error marker.
    pub failed: usize,
    /// Where the output was written.
    pub output: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Extract
// ---------------------------------------------------------------------------

/// Configuration for [`run_extract`].
#[derive(Debug, Clone)]
pub struct ExtractRunConfig {
    /// Pages to extract, in output order.
    pub urls: Vec<String>,
    /// Output file.
    pub output: PathBuf,
    /// Request settings.
    pub extract: ExtractConfig,
}

/// Extract every URL in order. Never fails; failed pages get a marker entry.
pub async fn extract_batch(
    extractor: &Extractor,
    urls: &[String],
    progress: &dyn ProgressReporter,
) -> Vec<ExtractedArticle> {
    let total = urls.len();
    let mut articles = Vec::with_capacity(total);

    for (i, url) in urls.iter().enumerate() {
        info!(%url, "fetching content");
        let content = extractor.fetch(url).await;

        if content.is_empty() {
            warn!(%url, "failed to extract content");
            articles.push(ExtractedArticle::failed(url.as_str()));
        } else {
            info!(
                %url,
                chars = content.chars().count(),
                preview = %preview(&content),
                "extracted content"
            );
            articles.push(ExtractedArticle::extracted(url.as_str(), content));
        }

        progress.page_extracted(url, i + 1, total);
    }

    articles
}

/// Run the extract batch and write the articles file.
#[instrument(skip_all, fields(urls = config.urls.len(), output = %config.output.display()))]
pub async fn run_extract(
    config: &ExtractRunConfig,
    progress: &dyn ProgressReporter,
) -> Result<(BatchSummary, Vec<ExtractedArticle>)> {
    let start = Instant::now();
    let extractor = Extractor::new(&config.extract)?;

    progress.phase("Extracting articles");
    let articles = extract_batch(&extractor, &config.urls, progress).await;

    progress.phase("Saving extracted articles");
    store::write_articles(&config.output, &articles)?;

    let failed = articles.iter().filter(|a| a.error.is_some()).count();
    let summary = BatchSummary {
        total: articles.len(),
        succeeded: articles.len() - failed,
        failed,
        output: config.output.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        total = summary.total,
        failed = summary.failed,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "extraction complete"
    );
    progress.done(&summary);

    Ok((summary, articles))
}

// ---------------------------------------------------------------------------
// Analyze
// ---------------------------------------------------------------------------

/// Configuration for [`run_analyze`].
#[derive(Debug, Clone)]
pub struct AnalyzeRunConfig {
    /// Articles file produced by the extract run.
    pub input: PathBuf,
    /// Reports file.
    pub output: PathBuf,
    /// Pages to analyze when `input` does not exist.
    pub fallback_urls: Vec<String>,
    /// Request settings for live extraction.
    pub extract: ExtractConfig,
}

/// Analyze every article in order. Never fails; each article yields one report.
///
/// Articles without usable content are fetched live; if that also yields
/// nothing, a content-unavailable report is recorded and the LLM is skipped.
pub async fn analyze_batch(
    extractor: &Extractor,
    analyzer: &Analyzer,
    articles: &[ExtractedArticle],
    progress: &dyn ProgressReporter,
) -> Vec<AnalysisReport> {
    let total = articles.len();
    let mut reports = Vec::with_capacity(total);

    for (i, article) in articles.iter().enumerate() {
        let url = article.url.as_str();

        let content = match article.usable_content() {
            Some(content) => content.to_string(),
            None => {
                info!(url, "content not available, attempting live fetch");
                extractor.fetch(url).await
            }
        };

        let report = if content.is_empty() {
            warn!(url, "skipping analysis due to missing content");
            AnalysisReport::content_unavailable(url)
        } else {
            info!(url, "starting analysis");
            AnalysisReport::new(url, analyzer.analyze(&content).await)
        };

        debug!(url, report = ?report, "analysis report");
        progress.page_analyzed(&report, i + 1, total);
        reports.push(report);
    }

    reports
}

/// Load the analyze run's input: the articles file, or the fallback URL list.
pub fn load_input(config: &AnalyzeRunConfig) -> Result<Vec<ExtractedArticle>> {
    if config.input.exists() {
        let articles = store::read_articles(&config.input)?;
        info!(count = articles.len(), input = %config.input.display(), "loaded articles");
        Ok(articles)
    } else {
        warn!(
            input = %config.input.display(),
            fallback = config.fallback_urls.len(),
            "articles file not found, fetching configured URLs live"
        );
        Ok(config
            .fallback_urls
            .iter()
            .map(|url| ExtractedArticle::pending(url.as_str()))
            .collect())
    }
}

/// Run the analyze batch and write the reports file.
#[instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub async fn run_analyze(
    config: &AnalyzeRunConfig,
    analyzer: &Analyzer,
    progress: &dyn ProgressReporter,
) -> Result<(BatchSummary, Vec<AnalysisReport>)> {
    let start = Instant::now();
    let extractor = Extractor::new(&config.extract)?;

    progress.phase("Loading articles");
    let articles = load_input(config)?;

    progress.phase("Analyzing articles");
    let reports = analyze_batch(&extractor, analyzer, &articles, progress).await;

    progress.phase("Saving analysis reports");
    store::write_reports(&config.output, &reports)?;

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    let summary = BatchSummary {
        total: reports.len(),
        succeeded: reports.len() - failed,
        failed,
        output: config.output.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        total = summary.total,
        skipped = summary.failed,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "analysis complete"
    );
    progress.done(&summary);

    Ok((summary, reports))
}

fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docreview_analyzer::LlmHandle;
    use docreview_shared::{CONTENT_UNAVAILABLE, CriterionKey, EXTRACTION_FAILED, LlmSettings};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LLM_REPLY: &str = r#"{
        "readability_for_marketer": {"assessment": "Clear.", "suggestions": ["Add a summary."]},
        "structure_and_flow": {"assessment": "Fine.", "suggestions": []},
        "completeness_and_examples": {"assessment": "Thin.", "suggestions": ["Add an example."]},
        "style_guidelines": {"assessment": "Good.", "suggestions": []}
    }"#;

    fn extract_config() -> ExtractConfig {
        ExtractConfig {
            timeout_secs: 2,
            urls: vec![],
        }
    }

    async fn mock_llm(server: &MockServer) -> Analyzer {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": LLM_REPLY } }]
            })))
            .mount(server)
            .await;

        Analyzer::new(LlmHandle::connect(LlmSettings {
            api_key: "sk-test".into(),
            model: "gpt-4o".into(),
            base_url: server.uri(),
            temperature: 0.7,
            timeout: None,
        }))
    }

    fn user_prompts(requests: &[wiremock::Request]) -> Vec<String> {
        requests
            .iter()
            .filter(|r| r.url.path() == "/chat/completions")
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["messages"][1]["content"].as_str().unwrap().to_string()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_stored_content_is_analyzed_once() {
        let llm = MockServer::start().await;
        let analyzer = mock_llm(&llm).await;
        let extractor = Extractor::new(&extract_config()).unwrap();

        let articles: Vec<ExtractedArticle> =
            serde_json::from_str(r#"[{"url":"https://x/a","content":"Sample text."}]"#).unwrap();

        let reports = analyze_batch(&extractor, &analyzer, &articles, &SilentProgress).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].url, "https://x/a");
        assert_eq!(reports[0].error, None);
        let json = serde_json::to_value(&reports[0]).unwrap();
        for key in CriterionKey::ALL {
            assert!(json.get(key.as_str()).is_some(), "missing {key}");
        }

        let prompts = user_prompts(&llm.received_requests().await.unwrap());
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("---\nSample text.\n---"));
    }

    #[tokio::test]
    async fn test_missing_content_is_fetched_live() {
        let server = MockServer::start().await;
        let analyzer = mock_llm(&server).await;

        Mock::given(method("GET"))
            .and(path("/hc/articles/2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><article><p>Live body</p></article></body></html>"),
            )
            .mount(&server)
            .await;

        let extractor = Extractor::new(&extract_config()).unwrap();
        let articles = vec![ExtractedArticle::failed(format!("{}/hc/articles/2", server.uri()))];

        let reports = analyze_batch(&extractor, &analyzer, &articles, &SilentProgress).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].criteria.readability_for_marketer.assessment, "Clear.");
        let prompts = user_prompts(&server.received_requests().await.unwrap());
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Live body"));
    }

    #[tokio::test]
    async fn test_unobtainable_content_skips_llm() {
        let llm = MockServer::start().await;
        let analyzer = mock_llm(&llm).await;
        let extractor = Extractor::new(&extract_config()).unwrap();

        let articles = vec![
            ExtractedArticle::pending("http://127.0.0.1:9/unreachable"),
            ExtractedArticle::extracted("https://x/b", "Second article."),
        ];

        let reports = analyze_batch(&extractor, &analyzer, &articles, &SilentProgress).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].url, "http://127.0.0.1:9/unreachable");
        assert_eq!(reports[0].error.as_deref(), Some(CONTENT_UNAVAILABLE));
        assert_eq!(reports[0].criteria.suggestion_count(), 0);
        assert_eq!(reports[1].url, "https://x/b");
        assert_eq!(reports[1].error, None);

        // Only the second article reached the LLM.
        assert_eq!(user_prompts(&llm.received_requests().await.unwrap()).len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_llm_still_reports_every_url() {
        let analyzer = Analyzer::new(LlmHandle::unavailable("no client"));
        let extractor = Extractor::new(&extract_config()).unwrap();
        let articles = vec![
            ExtractedArticle::extracted("https://x/a", "One."),
            ExtractedArticle::extracted("https://x/b", "Two."),
        ];

        let reports = analyze_batch(&extractor, &analyzer, &articles, &SilentProgress).await;

        assert_eq!(reports.len(), 2);
        for report in &reports {
            for (_, criterion) in report.criteria.iter() {
                assert_eq!(criterion.assessment, "LLM client not initialized.");
                assert!(criterion.suggestions.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_extract_batch_continues_after_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<main><p>Good page</p></main>"),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let extractor = Extractor::new(&extract_config()).unwrap();
        let urls = vec![
            "http://127.0.0.1:9/unreachable".to_string(),
            format!("{}/broken", server.uri()),
            format!("{}/ok", server.uri()),
        ];

        let articles = extract_batch(&extractor, &urls, &SilentProgress).await;

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].error.as_deref(), Some(EXTRACTION_FAILED));
        assert_eq!(articles[1].content, None);
        assert_eq!(articles[2].content.as_deref(), Some("Good page"));
        assert_eq!(articles[2].error, None);
        let urls_out: Vec<_> = articles.iter().map(|a| a.url.clone()).collect();
        assert_eq!(urls_out, urls);
    }

    #[tokio::test]
    async fn test_run_extract_then_analyze() {
        let server = MockServer::start().await;
        let analyzer = mock_llm(&server).await;

        Mock::given(method("GET"))
            .and(path("/doc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<article><h1>Doc</h1><p>Text.</p></article>"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let extracted = dir.path().join("extracted_articles_complete.json");
        let reports_path = dir.path().join("reports.json");

        let extract_run = ExtractRunConfig {
            urls: vec![format!("{}/doc", server.uri())],
            output: extracted.clone(),
            extract: extract_config(),
        };
        let (summary, _) = run_extract(&extract_run, &SilentProgress).await.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.failed, 0);

        let analyze_run = AnalyzeRunConfig {
            input: extracted,
            output: reports_path.clone(),
            fallback_urls: vec![],
            extract: extract_config(),
        };
        let (summary, reports) = run_analyze(&analyze_run, &analyzer, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(reports[0].criteria.completeness_and_examples.suggestions, ["Add an example."]);

        let saved = store::read_reports(&reports_path).unwrap();
        assert_eq!(saved, reports);
    }

    #[test]
    fn test_load_input_falls_back_to_urls() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzeRunConfig {
            input: dir.path().join("absent.json"),
            output: dir.path().join("out.json"),
            fallback_urls: vec!["https://x/a".into(), "https://x/b".into()],
            extract: extract_config(),
        };

        let articles = load_input(&config).unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.content.is_none() && a.error.is_none()));
    }

    #[test]
    fn test_preview_is_char_bounded() {
        let text = "é".repeat(300);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
    }
}
