// src/analyze/excerpt.rs
//! Plain-text excerpt + read time from a post's HTML body.

use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

pub const EXCERPT_MAX_CHARS: usize = 300;
pub const ELLIPSIS: &str = "...";
const WORDS_PER_MINUTE: f64 = 200.0;

/// Elements that never contribute readable text.
const SKIPPED_TAGS: [&str; 10] = [
    "figure",
    "figcaption",
    "iframe",
    "img",
    "picture",
    "video",
    "audio",
    "svg",
    "script",
    "style",
];
const ZOOM_WRAPPER_CLASS: &str = "medium-zoom-image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub text: String,
    pub read_time: u32,
}

fn is_skipped(el: &Element) -> bool {
    SKIPPED_TAGS.contains(&el.name()) || el.classes().any(|c| c == ZOOM_WRAPPER_CLASS)
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) if !is_skipped(inner) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Visible text of an HTML fragment, whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    // Some feed dialects double-escape the body.
    let decoded;
    let markup = if !html.contains('<') && html.contains("&lt;") {
        decoded = html_escape::decode_html_entities(html).to_string();
        decoded.as_str()
    } else {
        html
    };

    let fragment = Html::parse_fragment(markup);
    let mut raw = String::with_capacity(markup.len());
    collect_text(fragment.root_element(), &mut raw);

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&raw, " ").trim().to_string()
}

/// First two sentences, capped at `EXCERPT_MAX_CHARS` (+ ellipsis).
pub fn excerpt_of(text: &str) -> String {
    let sentences: Vec<&str> = text
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .take(2)
        .collect();
    if sentences.is_empty() {
        return String::new();
    }
    let joined = format!("{}.", sentences.join("."));
    if joined.chars().count() > EXCERPT_MAX_CHARS {
        let mut cut: String = joined.chars().take(EXCERPT_MAX_CHARS).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        joined
    }
}

/// Minutes at 200 wpm, rounded, never below 1.
pub fn read_time_minutes(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    let minutes = (words as f64 / WORDS_PER_MINUTE).round() as u32;
    minutes.max(1)
}

pub fn extract(html: &str) -> Excerpt {
    let text = plain_text(html);
    Excerpt {
        text: excerpt_of(&text),
        read_time: read_time_minutes(&text),
    }
}
