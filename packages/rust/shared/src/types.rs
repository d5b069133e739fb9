//! Core domain types: extracted articles and analysis reports.

use serde::{Deserialize, Serialize};

/// `error` value recorded on an [`ExtractedArticle`] whose extraction failed.
pub const EXTRACTION_FAILED: &str = "Content extraction failed";

/// Assessment and `error` value for a URL whose content could not be obtained.
pub const CONTENT_UNAVAILABLE: &str = "Content not available for analysis.";

// ---------------------------------------------------------------------------
// ExtractedArticle
// ---------------------------------------------------------------------------

/// One element of `extracted_articles_complete.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    /// Page URL, the sole identifier.
    pub url: String,
    /// Extracted plain text, `null` when extraction failed.
    #[serde(default)]
    pub content: Option<String>,
    /// Failure marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractedArticle {
    /// An article whose content was extracted.
    pub fn extracted(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: Some(content.into()),
            error: None,
        }
    }

    /// An article whose extraction failed.
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
            error: Some(EXTRACTION_FAILED.to_string()),
        }
    }

    /// A URL with no content yet (to be fetched live).
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
            error: None,
        }
    }

    /// The stored content, if present and non-empty.
    pub fn usable_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The four fixed editorial criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionKey {
    ReadabilityForMarketer,
    StructureAndFlow,
    CompletenessAndExamples,
    StyleGuidelines,
}

impl CriterionKey {
    /// All criteria, in report order.
    pub const ALL: [CriterionKey; 4] = [
        Self::ReadabilityForMarketer,
        Self::StructureAndFlow,
        Self::CompletenessAndExamples,
        Self::StyleGuidelines,
    ];

    /// JSON key of this criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadabilityForMarketer => "readability_for_marketer",
            Self::StructureAndFlow => "structure_and_flow",
            Self::CompletenessAndExamples => "completeness_and_examples",
            Self::StyleGuidelines => "style_guidelines",
        }
    }
}

impl std::fmt::Display for CriterionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessment plus actionable suggestions for one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisCriterion {
    pub assessment: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl AnalysisCriterion {
    /// A placeholder criterion with no suggestions.
    pub fn placeholder(assessment: impl Into<String>) -> Self {
        Self {
            assessment: assessment.into(),
            suggestions: Vec::new(),
        }
    }
}

/// The four-criterion critique. Every criterion is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaReport {
    pub readability_for_marketer: AnalysisCriterion,
    pub structure_and_flow: AnalysisCriterion,
    pub completeness_and_examples: AnalysisCriterion,
    pub style_guidelines: AnalysisCriterion,
}

impl CriteriaReport {
    /// A degraded report: every criterion carries `assessment` and no suggestions.
    pub fn degraded(assessment: &str) -> Self {
        Self {
            readability_for_marketer: AnalysisCriterion::placeholder(assessment),
            structure_and_flow: AnalysisCriterion::placeholder(assessment),
            completeness_and_examples: AnalysisCriterion::placeholder(assessment),
            style_guidelines: AnalysisCriterion::placeholder(assessment),
        }
    }

    /// Look up a criterion by key.
    pub fn get(&self, key: CriterionKey) -> &AnalysisCriterion {
        match key {
            CriterionKey::ReadabilityForMarketer => &self.readability_for_marketer,
            CriterionKey::StructureAndFlow => &self.structure_and_flow,
            CriterionKey::CompletenessAndExamples => &self.completeness_and_examples,
            CriterionKey::StyleGuidelines => &self.style_guidelines,
        }
    }

    /// Iterate criteria in report order.
    pub fn iter(&self) -> impl Iterator<Item = (CriterionKey, &AnalysisCriterion)> {
        CriterionKey::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// Total number of suggestions across all criteria.
    pub fn suggestion_count(&self) -> usize {
        self.iter().map(|(_, c)| c.suggestions.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// AnalysisReport
// ---------------------------------------------------------------------------

/// One element of the analysis reports output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    #[serde(flatten)]
    pub criteria: CriteriaReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// Merge a URL into an analyzer result.
    pub fn new(url: impl Into<String>, criteria: CriteriaReport) -> Self {
        Self {
            url: url.into(),
            criteria,
            error: None,
        }
    }

    /// Report for a URL whose content could not be obtained; analysis was skipped.
    pub fn content_unavailable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            criteria: CriteriaReport::degraded(CONTENT_UNAVAILABLE),
            error: Some(CONTENT_UNAVAILABLE.to_string()),
        }
    }
}
