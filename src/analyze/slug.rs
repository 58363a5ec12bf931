// src/analyze/slug.rs
//! Title → URL slug.

use once_cell::sync::OnceCell;
use regex::Regex;
use sha2::{Digest, Sha256};

/// CJK unified ideographs survive slugging so Chinese titles stay readable.
fn is_kept_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || c.is_whitespace()
        || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Lowercase, strip punctuation, hyphenate whitespace. Pure; no uniqueness.
pub fn slugify(title: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    static RE_DASH: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    let re_dash = RE_DASH.get_or_init(|| Regex::new(r"-+").unwrap());

    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|&c| is_kept_char(c))
        .collect();
    let hyphenated = re_ws.replace_all(&kept, "-");
    let collapsed = re_dash.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Short, stable suffix used to tell apart posts whose titles slug identically.
pub fn disambiguation_suffix(medium_url: &str) -> String {
    let digest = Sha256::digest(medium_url.as_bytes());
    let mut out = String::with_capacity(6);
    for b in digest.iter().take(3) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_title_becomes_plain_slug() {
        assert_eq!(
            slugify("Why am I taking a year off?"),
            "why-am-i-taking-a-year-off"
        );
    }

    #[test]
    fn punctuation_and_dash_runs_collapse() {
        assert_eq!(slugify("  Hello -- World!!  "), "hello-world");
        assert_eq!(slugify("C++ & Rust: a -- story"), "c-rust-a-story");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn chinese_title_is_not_mangled() {
        let s = slugify("我的間隔年 Gap Year 心得");
        assert_eq!(s, "我的間隔年-gap-year-心得");
        assert_eq!(slugify("工程實習"), "工程實習");
    }

    #[test]
    fn only_symbols_yields_empty() {
        assert_eq!(slugify("?!…"), "");
    }

    #[test]
    fn suffix_is_six_hex_chars_and_stable() {
        let a = disambiguation_suffix("https://medium.com/p/1");
        assert_eq!(a.len(), 6);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, disambiguation_suffix("https://medium.com/p/1"));
        assert_ne!(a, disambiguation_suffix("https://medium.com/p/2"));
    }
}
