// src/blog.rs
//! Read-only projections over the post store, as consumed by the blog UI.

use chrono::{NaiveDate, Utc};

use crate::model::{Category, NormalizedPost, PostSource, DEFAULT_COLOR};
use crate::store::PostStore;

pub const ALL_CATEGORIES: &str = "All";
pub const DEFAULT_RECENT: usize = 3;

/// Placeholder shown until the first successful sync, so the blog never renders empty.
pub fn fallback_post(author_profile_url: &str) -> NormalizedPost {
    let text = "This is a placeholder post while we sync your Medium articles. \
                The sync system will automatically pull your latest posts from Medium.";
    NormalizedPost {
        id: "fallback-1".into(),
        title: "Welcome to My Blog".into(),
        excerpt: text.into(),
        content: format!("<p>{text}</p>"),
        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
        category: Category::Life,
        read_time: 2,
        tags: vec!["welcome".into(), "blog".into(), "medium".into()],
        slug: "welcome-to-my-blog".into(),
        featured: true,
        color: DEFAULT_COLOR.into(),
        medium_url: author_profile_url.into(),
        source: PostSource::Medium,
        last_sync: Utc::now(),
    }
}

#[derive(Debug, Clone)]
pub struct BlogIndex {
    posts: Vec<NormalizedPost>,
}

impl BlogIndex {
    /// Store contents, or the placeholder when there is nothing yet.
    pub fn from_posts(posts: Vec<NormalizedPost>, author_profile_url: &str) -> Self {
        if posts.is_empty() {
            return Self {
                posts: vec![fallback_post(author_profile_url)],
            };
        }
        Self { posts }
    }

    pub async fn load(store: &PostStore, author_profile_url: &str) -> Self {
        Self::from_posts(store.load().await, author_profile_url)
    }

    pub fn posts(&self) -> &[NormalizedPost] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<NormalizedPost> {
        self.posts
    }

    /// `"All"` followed by each category in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out = vec![ALL_CATEGORIES.to_string()];
        for p in &self.posts {
            let c = p.category.as_str();
            if !out.iter().any(|x| x == c) {
                out.push(c.to_string());
            }
        }
        out
    }

    pub fn by_category(&self, category: &str) -> Vec<NormalizedPost> {
        if category == ALL_CATEGORIES {
            return self.posts.clone();
        }
        self.posts
            .iter()
            .filter(|p| p.category.as_str() == category)
            .cloned()
            .collect()
    }

    pub fn recent(&self, limit: usize) -> &[NormalizedPost] {
        &self.posts[..limit.min(self.posts.len())]
    }

    /// Leading window with slice-style bounds: a negative `limit` drops that
    /// many posts from the end instead.
    pub fn head(&self, limit: i64) -> &[NormalizedPost] {
        let len = self.posts.len();
        let n = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
        let end = if limit < 0 {
            len.saturating_sub(n)
        } else {
            n.min(len)
        };
        &self.posts[..end]
    }

    pub fn by_slug(&self, slug: &str) -> Option<&NormalizedPost> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn featured(&self) -> Option<&NormalizedPost> {
        self.posts
            .iter()
            .find(|p| p.featured)
            .or_else(|| self.posts.first())
    }
}
