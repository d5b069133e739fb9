//! Noise removal and visible-text extraction.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

use docreview_shared::Result;

use crate::strategies::{self, SelectorStrategy};

/// Elements skipped together with their entire subtree.
pub const NOISE_TAGS: [&str; 6] = ["script", "style", "nav", "footer", "header", "aside"];

/// Extracted text plus the strategy that located it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Line-based plain text; never contains an empty line.
    pub text: String,
    /// `None` when no strategy matched and the body was used.
    pub strategy: Option<SelectorStrategy>,
}

impl Extraction {
    /// Whether the body fallback was used.
    pub fn used_fallback(&self) -> bool {
        self.strategy.is_none()
    }
}

/// Extract the article text from a parsed document.
pub fn extract(doc: &Html) -> Result<Extraction> {
    match strategies::find_container(doc)? {
        Some((strategy, container)) => Ok(Extraction {
            text: element_text(container),
            strategy: Some(strategy),
        }),
        None => Ok(Extraction {
            text: element_text(strategies::body_or_root(doc)?),
            strategy: None,
        }),
    }
}

/// Extract the article text from raw HTML.
pub fn extract_html(html: &str) -> Result<Extraction> {
    extract(&Html::parse_document(html))
}

/// Visible text of `el`, one text run per line, noise elements skipped.
pub fn element_text(el: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    collect_text(el, &mut lines);
    lines.join("\n")
}

fn collect_text(el: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let line = collapse_whitespace(text);
                if !line.is_empty() {
                    lines.push(line);
                }
            }
            Node::Element(child_el) => {
                if is_noise(child_el.name()) {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if child_el.name() == "noscript" {
                    collect_noscript_text(&child_ref.text().collect::<String>(), lines);
                } else {
                    collect_text(child_ref, lines);
                }
            }
            _ => {}
        }
    }
}

/// The parser runs with scripting enabled, so `<noscript>` content arrives as
/// one raw text node. Re-parse it so only its visible text is kept.
fn collect_noscript_text(raw: &str, lines: &mut Vec<String>) {
    if raw.trim().is_empty() {
        return;
    }
    let fragment = Html::parse_fragment(raw);
    collect_text(fragment.root_element(), lines);
}

fn is_noise(tag: &str) -> bool {
    NOISE_TAGS.contains(&tag)
}

/// Collapse runs of whitespace (including newlines) to one space and trim.
fn collapse_whitespace(s: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(s, " ").trim().to_string()
}
