//! Batch keyword extraction.
//!
//! Frequency mode counts normalized tokens across the whole batch. Weighted mode
//! re-ranks unigrams and bigrams by mean TF-IDF and falls back to frequency when
//! the batch is too small or the filtered vocabulary ends up empty.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::{KeywordMode, KeywordSettings};
use crate::models::KeywordEntry;
use crate::normalize::TextNormalizer;

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    normalizer: TextNormalizer,
    settings: KeywordSettings,
}

impl KeywordExtractor {
    pub fn new(normalizer: TextNormalizer, settings: KeywordSettings) -> Self {
        Self {
            normalizer,
            settings,
        }
    }

    /// Extracts up to `top_n` keywords with the configured mode.
    pub fn extract<S: AsRef<str>>(&self, texts: &[S], top_n: usize) -> Vec<KeywordEntry> {
        let documents: Vec<Vec<String>> = texts
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| t.chars().count() >= self.settings.min_comment_length)
            .map(|t| self.normalizer.tokens(t))
            .collect();

        match self.settings.mode {
            KeywordMode::Frequency => rank_by_frequency(&documents, top_n),
            KeywordMode::Weighted => {
                let usable = documents.iter().filter(|d| !d.is_empty()).count();
                if usable < self.settings.weighted_min_documents {
                    debug!(
                        "Weighted keywords skipped - usable_documents={}, required={}",
                        usable, self.settings.weighted_min_documents
                    );
                    return rank_by_frequency(&documents, top_n);
                }
                let weighted = rank_by_tfidf(&documents, &self.settings, top_n);
                if weighted.is_empty() {
                    debug!("Weighted vocabulary empty after df filtering, using frequency");
                    rank_by_frequency(&documents, top_n)
                } else {
                    weighted
                }
            }
        }
    }
}

/// Counts terms in first-seen order so that a stable sort keeps ties in that order.
struct TermCounter {
    order: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<usize>,
}

impl TermCounter {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
            counts: Vec::new(),
        }
    }

    fn add(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&i) => self.counts[i] += 1,
            None => {
                self.index.insert(term.to_string(), self.order.len());
                self.order.push(term.to_string());
                self.counts.push(1);
            }
        }
    }

    fn count(&self, term: &str) -> usize {
        self.index.get(term).map(|&i| self.counts[i]).unwrap_or(0)
    }
}

pub fn rank_by_frequency(documents: &[Vec<String>], top_n: usize) -> Vec<KeywordEntry> {
    let mut counter = TermCounter::new();
    for token in documents.iter().flatten() {
        counter.add(token);
    }

    let mut ranked: Vec<(usize, usize)> = counter.counts.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(i, count)| KeywordEntry {
            term: counter.order[i].clone(),
            count,
            weight: count as f64,
        })
        .collect()
}

fn document_terms(tokens: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = tokens.to_vec();
    terms.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    terms
}

/// Mean TF-IDF ranking with smooth idf and L2-normalized document vectors.
pub fn rank_by_tfidf(
    documents: &[Vec<String>],
    settings: &KeywordSettings,
    top_n: usize,
) -> Vec<KeywordEntry> {
    let docs: Vec<Vec<String>> = documents
        .iter()
        .filter(|d| !d.is_empty())
        .map(|d| document_terms(d))
        .collect();
    let n_docs = docs.len();
    if n_docs == 0 {
        return Vec::new();
    }

    let mut corpus = TermCounter::new();
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        let mut seen: HashSet<&str> = HashSet::new();
        for term in doc {
            corpus.add(term);
            if seen.insert(term.as_str()) {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
    }

    let max_df = settings.max_df * n_docs as f64;
    let mut vocabulary: Vec<(usize, usize)> = corpus
        .order
        .iter()
        .enumerate()
        .filter(|(_, term)| {
            let df = doc_freq.get(term.as_str()).copied().unwrap_or(0);
            df >= settings.min_df && (df as f64) <= max_df
        })
        .map(|(i, _)| (i, corpus.counts[i]))
        .collect();
    vocabulary.sort_by(|a, b| b.1.cmp(&a.1));
    vocabulary.truncate(settings.max_features);
    vocabulary.sort_by_key(|(i, _)| *i);
    if vocabulary.is_empty() {
        return Vec::new();
    }

    let idf: HashMap<&str, f64> = vocabulary
        .iter()
        .map(|(i, _)| {
            let term = corpus.order[*i].as_str();
            let df = doc_freq[term] as f64;
            (term, ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0)
        })
        .collect();

    let mut weight_sums: HashMap<&str, f64> = HashMap::new();
    for doc in &docs {
        let mut tf = TermCounter::new();
        for term in doc.iter().filter(|t| idf.contains_key(t.as_str())) {
            tf.add(term);
        }
        let weights: Vec<(&str, f64)> = tf
            .order
            .iter()
            .filter_map(|term| {
                idf.get_key_value(term.as_str())
                    .map(|(key, w)| (*key, tf.count(term) as f64 * w))
            })
            .collect();
        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        for (term, w) in weights {
            *weight_sums.entry(term).or_insert(0.0) += w / norm;
        }
    }

    let mut ranked: Vec<KeywordEntry> = vocabulary
        .iter()
        .map(|(i, count)| {
            let term = corpus.order[*i].as_str();
            KeywordEntry {
                term: term.to_string(),
                count: *count,
                weight: weight_sums.get(term).copied().unwrap_or(0.0) / n_docs as f64,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    ranked.truncate(top_n);
    ranked
}
