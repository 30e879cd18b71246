//! Batch analysis pipeline.
//!
//! Per-comment signals are computed in parallel (rayon keeps input order), then the
//! batch is reduced into aggregates, keywords and insights. All rule tables and
//! regexes are compiled once in `Analyzer::new` and shared read-only.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::{AggregationEngine, Aggregates};
use crate::classify::{JourneyClassifier, OpinionClassifier};
use crate::config::{AnalyzerConfig, DEFAULT_CONFIG};
use crate::error::Result;
use crate::insights::{InsightContext, InsightSynthesizer};
use crate::keywords::KeywordExtractor;
use crate::language::LanguageTagger;
use crate::matcher::TermMatcher;
use crate::models::{Comment, CommentBatch, CommentSignals, Report};
use crate::normalize::TextNormalizer;
use crate::sentiment::SentimentScorer;

pub struct Analyzer {
    config: Arc<AnalyzerConfig>,
    sentiment: SentimentScorer,
    language: LanguageTagger,
    opinions: OpinionClassifier,
    journey: JourneyClassifier,
    keywords: KeywordExtractor,
    insights: InsightSynthesizer,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let matcher = config.lexical_match.matcher();
        Self::with_matcher(config, matcher)
    }

    /// Like `new`, with a custom lexicon matching strategy for the sentiment scorer.
    pub fn with_matcher(config: AnalyzerConfig, matcher: Box<dyn TermMatcher>) -> Result<Self> {
        config.validate()?;
        let normalizer = TextNormalizer::new(&config.stop_terms);
        let analyzer = Self {
            sentiment: SentimentScorer::with_matcher(&config, matcher)?,
            language: LanguageTagger::new(&config),
            opinions: OpinionClassifier::new(&config),
            journey: JourneyClassifier::new(&config),
            keywords: KeywordExtractor::new(normalizer, config.keywords.clone()),
            insights: InsightSynthesizer::new(&config),
            config: Arc::new(config),
        };
        info!(
            "Analyzer ready - categories={}, stages={}, keyword_mode={:?}, language_detector={}",
            analyzer.config.opinion_taxonomy.len(),
            analyzer.config.journey_stages.len(),
            analyzer.config.keywords.mode,
            analyzer.language.uses_detector()
        );
        Ok(analyzer)
    }

    pub fn from_default() -> Result<Self> {
        Self::new(DEFAULT_CONFIG.clone())
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<AnalyzerConfig> {
        Arc::clone(&self.config)
    }

    /// All four signals for one comment.
    pub fn classify(&self, comment: &Comment) -> CommentSignals {
        let text = comment.text.as_str();
        CommentSignals {
            sentiment: self.sentiment.score(text),
            language: self.language.tag(text),
            opinions: self.opinions.classify(text),
            journey: self.journey.classify(text),
        }
    }

    /// Signals for every comment, in input order. A comment whose classification
    /// panics gets degraded defaults instead of failing the batch.
    pub fn classify_batch(&self, comments: &[Comment]) -> Vec<CommentSignals> {
        comments
            .par_iter()
            .map(|comment| {
                panic::catch_unwind(AssertUnwindSafe(|| self.classify(comment))).unwrap_or_else(
                    |_| {
                        warn!("Comment classification failed, using defaults - id={}", comment.id);
                        CommentSignals::degraded(self.opinions.fallback())
                    },
                )
            })
            .collect()
    }

    pub fn analyze(&self, comments: &[Comment]) -> Report {
        self.analyze_batch(&CommentBatch::from_comments(comments.to_vec()))
    }

    pub fn analyze_batch(&self, batch: &CommentBatch) -> Report {
        let started = Instant::now();
        let comments = batch.comments.as_slice();

        let signals = self.classify_batch(comments);
        debug!("Signals computed - comments={}", signals.len());

        let aggregates = AggregationEngine::new(&self.config).aggregate(comments, &signals);

        let top_n = batch.top_keywords.unwrap_or(self.config.keywords.top_n);
        let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
        let keywords = self.keywords.extract(&texts, top_n);

        let ctx = InsightContext::new(&aggregates, &keywords, &self.config);
        let insights = self.insights.synthesize(&ctx);
        let action_items = self.insights.action_items(&ctx);

        let Aggregates {
            total,
            sentiment,
            languages,
            opinions,
            journey,
            concerns,
            highlights,
        } = aggregates;

        info!(
            "Batch analyzed - item={}, comments={}, positive_pct={:.1}, negative_pct={:.1}, insights={}, elapsed_ms={}",
            batch.item_id.as_deref().unwrap_or("-"),
            total,
            sentiment.positive_pct,
            sentiment.negative_pct,
            insights.len(),
            started.elapsed().as_millis()
        );

        Report {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            item_id: batch.item_id.clone(),
            analyzed_comments: total,
            total_available: batch.total_available,
            sentiment,
            keywords,
            languages,
            opinions,
            journey,
            concerns,
            highlights,
            insights,
            action_items,
        }
    }
}
