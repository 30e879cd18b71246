//! Text normalization for keyword extraction.
//!
//! Every step is total: malformed input only ever yields fewer tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Pictographic blocks: emoticons, misc symbols & pictographs, transport, flags, dingbats.
static DECORATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\u{1F1E0}-\u{1F1FF}\u{2702}-\u{27B0}]+",
    )
    .unwrap()
});

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s가-힣a-zA-Z0-9]").unwrap());

/// Removes links and markup tags, collapses whitespace and trims.
pub fn clean_text(text: &str) -> String {
    let text = URL_RE.replace_all(text, "");
    let text = MARKUP_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stop_terms: HashSet<String>,
}

impl TextNormalizer {
    pub fn new<I, S>(stop_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_terms: stop_terms
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Lowercase word tokens in original order, minus stop terms and single characters.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned = clean_text(text);
        let without_emoji = DECORATIVE_RE.replace_all(&cleaned, "");
        let lowered = without_emoji.to_lowercase();
        let spaced = NON_WORD_RE.replace_all(&lowered, " ");

        spaced
            .split_whitespace()
            .filter(|t| t.chars().count() > 1)
            .filter(|t| !self.stop_terms.contains(*t))
            .map(str::to_string)
            .collect()
    }

    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}
