//! Help-center page fetching and article text extraction.
//!
//! This crate provides:
//! - [`Extractor`]: fetches a page and returns its article text
//! - [`SelectorStrategy`]: ordered strategies for locating the article container
//! - [`text`]: noise removal and line-based text extraction

pub mod engine;
pub mod strategies;
pub mod text;

pub use engine::{Extractor, extract_document};
pub use strategies::SelectorStrategy;
pub use text::{Extraction, NOISE_TAGS};
