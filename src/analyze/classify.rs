// src/analyze/classify.rs
//! Keyword-scoring category classifier.
//!
//! Score per category = 3 per keyword contained in the lowercased title
//! + 1 per keyword contained in the lowercased body. Containment is plain
//! substring matching ("art" hits "start"), so the result is a heuristic:
//! good enough to group blog posts, never a guarantee.
//!
//! The keyword table is data, not code: `KeywordClassifier::default_seed()`
//! carries the built-in table and `load_from_file` swaps in a TOML one:
//!
//! ```toml
//! [[categories]]
//! name = "Gap Year"
//! keywords = ["gap year", "fellowship"]
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::model::Category;

pub const MAX_TAGS: usize = 4;
const MIN_TAG_CHARS: usize = 3;
const STOPWORDS: [&str; 4] = ["the", "and", "for", "with"];

/// Outcome of classifying one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub tags: Vec<String>,
}

/// Replaceable classification strategy.
pub trait Classifier: Send + Sync {
    fn classify(&self, title: &str, body: &str, hints: &[String]) -> Classification;
}

/// Ordered category → keyword table. Earlier rows win ties.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    table: Vec<(Category, Vec<String>)>,
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    categories: Vec<KeywordRow>,
}

#[derive(Debug, Deserialize)]
struct KeywordRow {
    name: String,
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new(table: Vec<(Category, Vec<String>)>) -> Self {
        let table = table
            .into_iter()
            .map(|(c, kws)| {
                let kws = kws
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (c, kws)
            })
            .collect();
        Self { table }
    }

    /// Built-in table tuned for a gap-year / engineering personal blog.
    pub fn default_seed() -> Self {
        let rows: [(Category, &[&str]); 5] = [
            (
                Category::GapYear,
                &["gap year", "jgp", "fellowship", "間隔年", "gap", "application"],
            ),
            (
                Category::Creative,
                &["art", "creative", "design", "photography", "artwork", "創作", "藝術"],
            ),
            (
                Category::Career,
                &["internship", "engineering", "career", "work", "professional", "工作", "實習"],
            ),
            (
                Category::Life,
                &["basketball", "sports", "life", "experience", "personal", "生活", "籃球"],
            ),
            (
                Category::Engineering,
                &["chemical", "engineering", "technical", "process", "shl medical", "工程"],
            ),
        ];
        Self::new(
            rows.into_iter()
                .map(|(c, kws)| (c, kws.iter().map(|k| k.to_string()).collect()))
                .collect(),
        )
    }

    /// Load a keyword table from TOML. Unknown category names are rejected.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading keyword table from {}", path.display()))?;
        let file: KeywordFile = toml::from_str(&content)
            .with_context(|| format!("parsing keyword table {}", path.display()))?;
        let mut table = Vec::with_capacity(file.categories.len());
        for row in file.categories {
            let cat = Category::parse(&row.name)
                .ok_or_else(|| anyhow!("unknown category '{}' in keyword table", row.name))?;
            table.push((cat, row.keywords));
        }
        if table.is_empty() {
            return Err(anyhow!("keyword table {} has no categories", path.display()));
        }
        Ok(Self::new(table))
    }

    pub fn table(&self) -> &[(Category, Vec<String>)] {
        &self.table
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::default_seed()
    }
}

fn hyphenate(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("-")
}

impl Classifier for KeywordClassifier {
    fn classify(&self, title: &str, body: &str, hints: &[String]) -> Classification {
        let title_lc = title.to_lowercase();
        let body_lc = body.to_lowercase();

        let mut category = Category::default();
        let mut best = 0u32;
        for (cat, keywords) in &self.table {
            let score: u32 = keywords
                .iter()
                .map(|k| {
                    let t = if title_lc.contains(k.as_str()) { 3 } else { 0 };
                    let b = if body_lc.contains(k.as_str()) { 1 } else { 0 };
                    t + b
                })
                .sum();
            if score > best {
                best = score;
                category = *cat;
            }
        }

        let matched = self
            .table
            .iter()
            .flat_map(|(_, kws)| kws.iter())
            .filter(|k| title_lc.contains(k.as_str()) || body_lc.contains(k.as_str()))
            .map(|k| hyphenate(k));
        let hinted = hints.iter().map(|h| hyphenate(&h.to_lowercase()));

        let mut tags: Vec<String> = Vec::new();
        for tag in matched.chain(hinted) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        let tags = tags
            .into_iter()
            .filter(|t| t.chars().count() >= MIN_TAG_CHARS && !STOPWORDS.contains(&t.as_str()))
            .take(MAX_TAGS)
            .collect();

        Classification { category, tags }
    }
}
