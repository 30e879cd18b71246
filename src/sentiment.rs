//! Rule-based sentiment scoring for short, informal comments.
//!
//! Works on the raw comment (emoji and punctuation carry signal) and adds up,
//! in fixed order:
//! 1. emoji balance
//! 2. lexical balance over Hangul / Latin word runs
//! 3. laughter runs (`ㅋㅋ`, `ㅎㅎ`)
//! 4. emphatic interjection opener, gated on laughter or positive words
//! 5. repeated `!`, unless a negative word matched
//! 6. flatline / ellipsis punctuation penalty, unless a positive word matched
//!
//! The label uses asymmetric thresholds (0.15 / -0.2 by default); the negative side
//! is stricter because mild complaints and sarcasm are noisier than mild praise.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::config::{AnalyzerConfig, SentimentThresholds};
use crate::error::{AnalyzerError, Result};
use crate::matcher::TermMatcher;
use crate::models::{SentimentLabel, SentimentResult};

static WORD_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[가-힣]+|[a-z]+").unwrap());

/// Individual contributions to a comment's score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub positive_emoji: usize,
    pub negative_emoji: usize,
    pub positive_words: usize,
    pub negative_words: usize,
    pub laughter_runs: usize,
    pub emoji: f64,
    pub lexical: f64,
    pub laughter: f64,
    pub interjection: f64,
    pub exclamation: f64,
    pub punctuation: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.emoji + self.lexical + self.laughter + self.interjection + self.exclamation
            + self.punctuation
    }
}

pub struct SentimentScorer {
    positive_words: Vec<String>,
    negative_words: Vec<String>,
    positive_emoji: Vec<String>,
    negative_emoji: Vec<String>,
    laughter_re: Option<Regex>,
    interjection_re: Option<Regex>,
    negative_punctuation_re: Regex,
    matcher: Box<dyn TermMatcher>,
    thresholds: SentimentThresholds,
}

impl SentimentScorer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        Self::with_matcher(config, config.lexical_match.matcher())
    }

    /// Builds a scorer with a custom lexicon matching strategy.
    pub fn with_matcher(config: &AnalyzerConfig, matcher: Box<dyn TermMatcher>) -> Result<Self> {
        let laughter_re = if config.laughter_chars.is_empty() {
            None
        } else {
            let pattern = config
                .laughter_chars
                .iter()
                .map(|c| format!("{}{{2,}}", regex::escape(&c.to_string())))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&pattern).map_err(|e| AnalyzerError::invalid_pattern(pattern, e))?)
        };

        let interjection_re = if config.interjections.is_empty() {
            None
        } else {
            let alternatives = config
                .interjections
                .iter()
                .map(|w| regex::escape(&w.to_lowercase()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"^(?:{})\s", alternatives);
            Some(Regex::new(&pattern).map_err(|e| AnalyzerError::invalid_pattern(pattern, e))?)
        };

        let negative_punctuation_re = Regex::new(&config.negative_punctuation)
            .map_err(|e| AnalyzerError::invalid_pattern(&config.negative_punctuation, e))?;

        Ok(Self {
            positive_words: lowercase_unique(&config.positive_words),
            negative_words: lowercase_unique(&config.negative_words),
            positive_emoji: unique(&config.positive_emoji),
            negative_emoji: unique(&config.negative_emoji),
            laughter_re,
            interjection_re,
            negative_punctuation_re,
            matcher,
            thresholds: config.sentiment.clone(),
        })
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        if text.is_empty() {
            return SentimentResult::neutral();
        }
        self.classify(self.breakdown(text).total())
    }

    /// Maps a raw score to a label, clamping only the polar cases.
    pub fn classify(&self, score: f64) -> SentimentResult {
        if score > self.thresholds.positive {
            SentimentResult {
                label: SentimentLabel::Positive,
                score: score.min(1.0),
            }
        } else if score < self.thresholds.negative {
            SentimentResult {
                label: SentimentLabel::Negative,
                score: score.max(-1.0),
            }
        } else {
            SentimentResult {
                label: SentimentLabel::Neutral,
                score,
            }
        }
    }

    pub fn breakdown(&self, text: &str) -> ScoreBreakdown {
        let t = &self.thresholds;
        let mut b = ScoreBreakdown::default();
        if text.is_empty() {
            return b;
        }

        b.positive_emoji = count_present(&self.positive_emoji, text);
        b.negative_emoji = count_present(&self.negative_emoji, text);
        let emoji_total = b.positive_emoji + b.negative_emoji;
        if emoji_total > 0 {
            b.emoji = (b.positive_emoji as f64 - b.negative_emoji as f64)
                / (emoji_total as f64 + 1.0)
                * t.emoji_weight;
        }

        let lowered = text.to_lowercase();
        let tokens: BTreeSet<&str> = WORD_RUN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();
        b.positive_words = self.count_matches(&tokens, &self.positive_words);
        b.negative_words = self.count_matches(&tokens, &self.negative_words);
        let word_total = b.positive_words + b.negative_words;
        if word_total > 0 {
            b.lexical = (b.positive_words as f64 - b.negative_words as f64)
                / (word_total as f64 + t.lexical_smoothing);
        }

        b.laughter_runs = self
            .laughter_re
            .as_ref()
            .map(|re| re.find_iter(text).count())
            .unwrap_or(0);
        b.laughter = t.laughter_weight * b.laughter_runs.min(t.laughter_cap) as f64;

        let opens_with_interjection = self
            .interjection_re
            .as_ref()
            .map(|re| re.is_match(lowered.trim_start()))
            .unwrap_or(false);
        if opens_with_interjection && (b.laughter_runs > 0 || b.positive_words > 0) {
            b.interjection = t.interjection_bonus;
        }

        if text.matches('!').count() >= t.exclamation_min && b.negative_words == 0 {
            b.exclamation = t.exclamation_bonus;
        }

        if b.positive_words == 0 && self.negative_punctuation_re.is_match(text) {
            b.punctuation = -t.negative_punctuation_penalty;
        }

        b
    }

    fn count_matches(&self, tokens: &BTreeSet<&str>, lexicon: &[String]) -> usize {
        tokens
            .iter()
            .filter(|token| lexicon.iter().any(|w| self.matcher.matches(w, token)))
            .count()
    }
}

fn count_present(emoji: &[String], text: &str) -> usize {
    emoji.iter().filter(|e| text.contains(e.as_str())).count()
}

fn unique(items: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .iter()
        .filter(|s| !s.is_empty() && seen.insert(s.as_str()))
        .cloned()
        .collect()
}

fn lowercase_unique(items: &[String]) -> Vec<String> {
    let lowered: Vec<String> = items.iter().map(|s| s.to_lowercase()).collect();
    unique(&lowered)
}
