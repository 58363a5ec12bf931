// src/analyze/mod.rs
//! Per-post content analysis: slug, excerpt/read time, category + tags,
//! and the transformer that composes them.

pub mod classify;
pub mod excerpt;
pub mod slug;
pub mod transform;

pub use crate::analyze::classify::{Classification, Classifier, KeywordClassifier};
pub use crate::analyze::excerpt::{extract, Excerpt};
pub use crate::analyze::slug::slugify;
pub use crate::analyze::transform::PostTransformer;
