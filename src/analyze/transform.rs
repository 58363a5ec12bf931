// src/analyze/transform.rs
//! Raw feed entry → `NormalizedPost` (before merging with stored history).

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use sha2::{Digest, Sha256};

use crate::analyze::classify::Classifier;
use crate::analyze::{excerpt, slug};
use crate::error::MissingContent;
use crate::ingest::types::RawFeedEntry;
use crate::model::{NormalizedPost, PostSource};

pub const UNTRACKED_KEY_PREFIX: &str = "urn:medium-sync:";

/// Body-bearing fields, tried in order; the first non-blank one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Encoded,
    Content,
    Description,
}

pub const CONTENT_FIELDS: [ContentField; 3] = [
    ContentField::Encoded,
    ContentField::Content,
    ContentField::Description,
];

impl ContentField {
    fn read(self, entry: &RawFeedEntry) -> Option<&str> {
        let v = match self {
            ContentField::Encoded => entry.content_encoded.as_deref(),
            ContentField::Content => entry.content.as_deref(),
            ContentField::Description => entry.description.as_deref(),
        };
        v.filter(|s| !s.trim().is_empty())
    }
}

/// Merge key for an entry with neither link nor guid. Stable across passes,
/// distinct for entries that differ in title, date or body.
pub fn untracked_key(entry: &RawFeedEntry, body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry.title.as_bytes());
    hasher.update(b"\n");
    hasher.update(entry.pub_date.as_deref().unwrap_or_default().as_bytes());
    hasher.update(b"\n");
    hasher.update(body.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::from(UNTRACKED_KEY_PREFIX);
    for b in digest.iter().take(8) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub fn extract_body(entry: &RawFeedEntry) -> Result<&str, MissingContent> {
    CONTENT_FIELDS
        .iter()
        .find_map(|f| f.read(entry))
        .ok_or_else(|| MissingContent {
            title: entry.title.clone(),
        })
}

/// Calendar date (UTC) of the feed timestamp. RFC 2822 first, RFC 3339 as fallback.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Composes excerpting, classification and slugging for one entry.
pub struct PostTransformer<'a> {
    classifier: &'a dyn Classifier,
}

impl<'a> PostTransformer<'a> {
    pub fn new(classifier: &'a dyn Classifier) -> Self {
        Self { classifier }
    }

    /// `index` is the entry's position in the current batch; it only feeds the
    /// provisional `featured` flag and synthesized ids.
    pub fn transform(&self, entry: &RawFeedEntry, index: usize, now: DateTime<Utc>) -> NormalizedPost {
        let body = match extract_body(entry) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(target: "sync", error = %e, "treating body as empty");
                ""
            }
        };

        let plain = excerpt::plain_text(body);
        let summary = excerpt::excerpt_of(&plain);
        let read_time = excerpt::read_time_minutes(&plain);
        let class = self
            .classifier
            .classify(&entry.title, &plain, &entry.categories);

        let date = match entry.pub_date.as_deref().and_then(parse_post_date) {
            Some(d) => d,
            None => {
                tracing::warn!(
                    target: "sync",
                    title = %entry.title,
                    pub_date = ?entry.pub_date,
                    "unparseable publish date; using sync date"
                );
                now.date_naive()
            }
        };

        let medium_url = entry
            .link
            .clone()
            .or_else(|| entry.guid.clone())
            .unwrap_or_else(|| {
                let key = untracked_key(entry, body);
                tracing::warn!(
                    target: "sync",
                    title = %entry.title,
                    key = %key,
                    "entry has no link or guid; keying it by content"
                );
                key
            });
        let id = entry
            .guid
            .clone()
            .unwrap_or_else(|| format!("medium-{}-{}", now.timestamp_millis(), index));

        NormalizedPost {
            id,
            title: entry.title.clone(),
            excerpt: summary,
            content: body.to_string(),
            date,
            category: class.category,
            read_time,
            tags: class.tags,
            slug: slug::slugify(&entry.title),
            featured: index == 0,
            color: class.category.color().to_string(),
            medium_url,
            source: PostSource::Medium,
            last_sync: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::classify::KeywordClassifier;
    use crate::model::Category;

    fn entry() -> RawFeedEntry {
        RawFeedEntry {
            title: "Why am I taking a year off?".into(),
            link: Some("https://medium.com/@me/why-1".into()),
            pub_date: Some("Tue, 04 Mar 2025 23:30:00 -0800".into()),
            content_encoded: Some(
                "<p>A gap year sounded scary. The fellowship helped.</p><figure>x</figure>".into(),
            ),
            content: Some("<p>ignored</p>".into()),
            description: Some("<p>ignored too</p>".into()),
            categories: vec!["Gap Year".into()],
            guid: Some("https://medium.com/p/abc".into()),
        }
    }

    #[test]
    fn content_fields_are_tried_in_order() {
        let mut e = entry();
        assert!(extract_body(&e).unwrap().contains("gap year"));
        e.content_encoded = Some("   ".into());
        assert_eq!(extract_body(&e).unwrap(), "<p>ignored</p>");
        e.content = None;
        assert_eq!(extract_body(&e).unwrap(), "<p>ignored too</p>");
        e.description = None;
        assert!(extract_body(&e).is_err());
    }

    #[test]
    fn full_entry_is_normalized() {
        let k = KeywordClassifier::default_seed();
        let now = Utc::now();
        let p = PostTransformer::new(&k).transform(&entry(), 0, now);
        assert_eq!(p.id, "https://medium.com/p/abc");
        assert_eq!(p.slug, "why-am-i-taking-a-year-off");
        assert_eq!(p.category, Category::GapYear);
        assert!(p.tags.contains(&"gap-year".to_string()));
        assert_eq!(p.color, "emerald");
        // 23:30 at -08:00 is the next day in UTC.
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(p.excerpt, "A gap year sounded scary. The fellowship helped.");
        assert!(p.featured);
        assert_eq!(p.last_sync, now);
        assert!(p.content.starts_with("<p>A gap year"));
    }

    #[test]
    fn missing_body_and_guid_do_not_fail() {
        let k = KeywordClassifier::default_seed();
        let now = Utc::now();
        let e = RawFeedEntry {
            title: "Untitled".into(),
            link: Some("https://medium.com/@me/u".into()),
            pub_date: None,
            ..Default::default()
        };
        let p = PostTransformer::new(&k).transform(&e, 2, now);
        assert_eq!(p.excerpt, "");
        assert_eq!(p.read_time, 1);
        assert_eq!(p.content, "");
        assert!(!p.featured);
        assert_eq!(p.id, format!("medium-{}-2", now.timestamp_millis()));
        assert_eq!(p.date, now.date_naive());
    }

    #[test]
    fn linkless_entries_get_stable_distinct_keys() {
        let k = KeywordClassifier::default_seed();
        let t = PostTransformer::new(&k);
        let now = Utc::now();
        let a = RawFeedEntry {
            title: "Draft one".into(),
            pub_date: Some("Mon, 03 Mar 2025 10:00:00 GMT".into()),
            ..Default::default()
        };
        let b = RawFeedEntry {
            title: "Draft two".into(),
            ..a.clone()
        };

        let pa = t.transform(&a, 0, now);
        let pb = t.transform(&b, 1, now);
        assert!(pa.medium_url.starts_with(UNTRACKED_KEY_PREFIX));
        assert_ne!(pa.medium_url, pb.medium_url);

        let later = now + chrono::Duration::hours(2);
        assert_eq!(t.transform(&a, 5, later).medium_url, pa.medium_url);
    }

    #[test]
    fn rfc3339_dates_are_accepted() {
        assert_eq!(
            parse_post_date("2024-12-31T23:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(parse_post_date("yesterday"), None);
    }
}
