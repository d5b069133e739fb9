//! Shared types, error model, and configuration for DocReview.
//!
//! This crate is the foundation depended on by all other DocReview crates.
//! It provides:
//! - [`DocReviewError`]: the unified error type
//! - Domain types ([`ExtractedArticle`], [`AnalysisReport`], [`CriteriaReport`])
//! - Configuration ([`AppConfig`], [`LlmSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExtractConfig, FilesConfig, LlmConfig, LlmSettings, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_llm_settings, resolve_llm_settings_with,
};
pub use error::{DocReviewError, Result};
pub use types::{
    AnalysisCriterion, AnalysisReport, CONTENT_UNAVAILABLE, CriteriaReport, CriterionKey,
    EXTRACTION_FAILED, ExtractedArticle,
};
