//! Ordered selector strategies for locating the article container.
//!
//! Strategies are tried in priority order; the first one that matches an
//! element wins. When none match, the caller falls back to `<body>`.

use scraper::{ElementRef, Html, Selector};

use docreview_shared::{DocReviewError, Result};

/// One way of locating the main content container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorStrategy {
    /// Semantic `<article>` element.
    Article,
    /// Semantic `<main>` element.
    Main,
    /// A `div` carrying the `article-body` class.
    ArticleBodyClass,
    /// The Zendesk help-center content container id.
    HelpCenterContentId,
}

impl SelectorStrategy {
    /// Strategies in priority order.
    pub const PRIORITY: [SelectorStrategy; 4] = [
        Self::Article,
        Self::Main,
        Self::ArticleBodyClass,
        Self::HelpCenterContentId,
    ];

    /// CSS selector for this strategy.
    pub fn css(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Main => "main",
            Self::ArticleBodyClass => "div.article-body",
            Self::HelpCenterContentId => "div#main-content",
        }
    }

    /// Human-readable strategy name for tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Main => "main",
            Self::ArticleBodyClass => "article-body",
            Self::HelpCenterContentId => "main-content",
        }
    }

    /// First element in `doc` matched by this strategy.
    pub fn find<'a>(&self, doc: &'a Html) -> Result<Option<ElementRef<'a>>> {
        let sel = parse_selector(self.css())?;
        Ok(doc.select(&sel).next())
    }
}

/// Find the content container, trying each strategy in priority order.
pub fn find_container(doc: &Html) -> Result<Option<(SelectorStrategy, ElementRef<'_>)>> {
    for strategy in SelectorStrategy::PRIORITY {
        if let Some(el) = strategy.find(doc)? {
            return Ok(Some((strategy, el)));
        }
    }
    Ok(None)
}

/// The `<body>` element, or the document root if the parser produced none.
pub fn body_or_root(doc: &Html) -> Result<ElementRef<'_>> {
    let sel = parse_selector("body")?;
    Ok(doc.select(&sel).next().unwrap_or_else(|| doc.root_element()))
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DocReviewError::parse(format!("invalid selector '{css}': {e}")))
}
