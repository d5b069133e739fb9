//! Batch orchestration and interchange files for DocReview.
//!
//! This crate ties extraction and analysis together into the two batch
//! runs (`extract`, `analyze`) and owns the JSON files handed between them.

pub mod pipeline;
pub mod store;
