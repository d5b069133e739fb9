//! JSON interchange files.
//!
//! Both files are ordered JSON arrays, UTF-8, indented with four spaces.
//! Writes go to a temp file in the same directory and are renamed into place.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use docreview_shared::{AnalysisReport, DocReviewError, ExtractedArticle, Result};

/// Read `extracted_articles_complete.json`.
pub fn read_articles(path: &Path) -> Result<Vec<ExtractedArticle>> {
    read_json(path)
}

/// Write `extracted_articles_complete.json`.
pub fn write_articles(path: &Path, articles: &[ExtractedArticle]) -> Result<()> {
    write_json_atomic(path, articles)
}

/// Read an analysis reports file.
pub fn read_reports(path: &Path) -> Result<Vec<AnalysisReport>> {
    read_json(path)
}

/// Write an analysis reports file.
pub fn write_reports(path: &Path, reports: &[AnalysisReport]) -> Result<()> {
    write_json_atomic(path, reports)
}

/// Serialize with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)
        .map_err(|e| DocReviewError::validation(format!("JSON serialization failed: {e}")))?;
    String::from_utf8(buf)
        .map_err(|e| DocReviewError::validation(format!("JSON output is not UTF-8: {e}")))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| DocReviewError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| DocReviewError::validation(format!("invalid {}: {e}", path.display())))
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let json = to_pretty_json(data)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DocReviewError::validation(format!("not a file path: {}", path.display())))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DocReviewError::io(parent, e))?;
    }

    std::fs::write(&temp, json).map_err(|e| DocReviewError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(DocReviewError::io(path, e));
    }

    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}
