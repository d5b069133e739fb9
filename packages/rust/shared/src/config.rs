//! Application configuration for DocReview.
//!
//! User config lives at `~/.docreview/docreview.toml`.
//! CLI flags override config file values, which override defaults.
//! The LLM credential is never stored in the file; only the name of the
//! environment variable holding it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DocReviewError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docreview.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docreview";

// ---------------------------------------------------------------------------
// Config structs (matching docreview.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Page extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Interchange file names.
    #[serde(default)]
    pub files: FilesConfig,
}

/// `[extract]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_extract_timeout")]
    pub timeout_secs: u64,

    /// Pages to process when none are given on the command line.
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_extract_timeout(),
            urls: default_urls(),
        }
    }
}

impl AppConfig {
    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.extract.timeout_secs == 0 {
            return Err(DocReviewError::config(
                "[extract] timeout_secs must be greater than 0",
            ));
        }
        if self.llm.timeout_secs == Some(0) {
            return Err(DocReviewError::config(
                "[llm] timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl ExtractConfig {
    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_extract_timeout() -> u64 {
    10
}
fn default_urls() -> Vec<String> {
    vec![
        "https://partners.moengage.com/hc/en-us/articles/9643917325460-Create-creatives".into(),
        "https://help.moengage.com/hc/en-us/articles/28194279371668-How-to-Analyze-OTT-Content-Performance".into(),
    ]
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Name of the env var that may override the model.
    #[serde(default = "default_model_env")]
    pub model_env: String,

    /// Model used when the override variable is unset.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Base URL of an OpenAI-compatible chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Optional request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model_env: default_model_env(),
            default_model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            timeout_secs: None,
        }
    }
}

fn default_api_key_env() -> String {
    "LLM_API_KEY".into()
}
fn default_model_env() -> String {
    "LLM_MODEL".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_temperature() -> f64 {
    0.7
}

/// `[files]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Extraction output / analysis input.
    #[serde(default = "default_extracted_file")]
    pub extracted: String,

    /// Analysis output.
    #[serde(default = "default_reports_file")]
    pub reports: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extracted: default_extracted_file(),
            reports: default_reports_file(),
        }
    }
}

fn default_extracted_file() -> String {
    "extracted_articles_complete.json".into()
}
fn default_reports_file() -> String {
    "moengage_documentation_analysis_reports_output.json".into()
}

// ---------------------------------------------------------------------------
// LLM settings (runtime, resolved from config + environment)
// ---------------------------------------------------------------------------

/// Resolved LLM connection settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// API credential.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Resolve LLM settings from the process environment.
///
/// Fails with a config error if the API key variable is unset or empty.
pub fn resolve_llm_settings(config: &AppConfig) -> Result<LlmSettings> {
    resolve_llm_settings_with(config, |name| std::env::var(name).ok())
}

/// Resolve LLM settings using `lookup` to read environment variables.
pub fn resolve_llm_settings_with(
    config: &AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LlmSettings> {
    let llm = &config.llm;

    let api_key = match lookup(&llm.api_key_env) {
        Some(val) if !val.trim().is_empty() => val,
        _ => {
            return Err(DocReviewError::config(format!(
                "LLM API key not found. Set the {} environment variable \
                 (a .env file in the working directory is also read).",
                llm.api_key_env
            )));
        }
    };

    let model = lookup(&llm.model_env)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| llm.default_model.clone());

    Ok(LlmSettings {
        api_key,
        model,
        base_url: llm.base_url.trim_end_matches('/').to_string(),
        temperature: llm.temperature,
        timeout: llm.timeout_secs.map(Duration::from_secs),
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docreview/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocReviewError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docreview/docreview.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocReviewError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DocReviewError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocReviewError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocReviewError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocReviewError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
