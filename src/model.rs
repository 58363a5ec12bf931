// src/model.rs
//! Persisted post record and its closed category set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Primary category. Closed set; `Life` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Category {
    GapYear,
    Creative,
    Career,
    #[default]
    Life,
    Engineering,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::GapYear,
        Category::Creative,
        Category::Career,
        Category::Life,
        Category::Engineering,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::GapYear => "Gap Year",
            Category::Creative => "Creative",
            Category::Career => "Career",
            Category::Life => "Life",
            Category::Engineering => "Engineering",
        }
    }

    /// Exact (case-insensitive) label match.
    pub fn parse(label: &str) -> Option<Self> {
        let l = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(l))
    }

    /// UI accent color riding along with the record.
    pub fn color(self) -> &'static str {
        match self {
            Category::GapYear => "emerald",
            Category::Creative => "purple",
            Category::Career => "blue",
            Category::Life => "orange",
            Category::Engineering => "teal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Store files written by other tools may carry labels outside the set.
impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::parse(&s).unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

/// Provenance marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostSource {
    #[default]
    Medium,
}

pub const DEFAULT_COLOR: &str = "blue";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// One blog post as persisted in the store and served to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: NaiveDate,
    pub category: Category,
    pub read_time: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub slug: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_color")]
    pub color: String,
    pub medium_url: String,
    #[serde(default)]
    pub source: PostSource,
    pub last_sync: DateTime<Utc>,
}
