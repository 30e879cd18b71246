//! Batch aggregation over per-comment signals.
//!
//! Produces per-dimension group breakdowns (language, opinion category, journey
//! stage), the sentiment overview, expectation / anxiety tallies and highlight
//! comments. All reductions walk comments in insertion order, so ties on
//! `like_count` resolve to the first comment encountered.

use std::collections::HashMap;

use crate::classify::mentions_any;
use crate::config::AnalyzerConfig;
use crate::models::{
    CategoryAggregate, Comment, CommentSignals, ConcernTallies, ExampleComment, GroupAggregate,
    Highlights, JourneyAggregate, JourneyStage, Language, LanguageAggregate, SentimentLabel,
    SentimentOverview,
};

/// Everything the insight layer needs from one batch.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub total: usize,
    pub sentiment: SentimentOverview,
    pub languages: Vec<LanguageAggregate>,
    pub opinions: Vec<CategoryAggregate>,
    pub journey: Vec<JourneyAggregate>,
    pub concerns: ConcernTallies,
    pub highlights: Highlights,
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    count: usize,
    positive: usize,
    negative: usize,
    representative: Option<usize>,
}

impl GroupAccumulator {
    fn add(&mut self, index: usize, comments: &[Comment], label: SentimentLabel) {
        self.count += 1;
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => {}
        }
        let replace = match self.representative {
            Some(current) => comments[index].like_count > comments[current].like_count,
            None => true,
        };
        if replace {
            self.representative = Some(index);
        }
    }

    fn finish(&self, key: &str, label: &str, total: usize, comments: &[Comment]) -> GroupAggregate {
        GroupAggregate {
            key: key.to_string(),
            label: label.to_string(),
            count: self.count,
            percentage: percentage(self.count, total),
            positive_pct: percentage(self.positive, self.count),
            negative_pct: percentage(self.negative, self.count),
            representative_example: self
                .representative
                .map(|i| ExampleComment::from_comment(&comments[i])),
        }
    }
}

pub struct AggregationEngine<'a> {
    config: &'a AnalyzerConfig,
    expectation_keywords: Vec<String>,
    anxiety_keywords: Vec<String>,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            config,
            expectation_keywords: lower(&config.expectation_keywords),
            anxiety_keywords: lower(&config.anxiety_keywords),
        }
    }

    /// `comments` and `signals` are parallel slices in insertion order.
    pub fn aggregate(&self, comments: &[Comment], signals: &[CommentSignals]) -> Aggregates {
        let total = comments.len().min(signals.len());
        let comments = &comments[..total];
        let signals = &signals[..total];

        Aggregates {
            total,
            sentiment: self.sentiment_overview(comments, signals),
            languages: self.languages(comments, signals),
            opinions: self.opinions(comments, signals),
            journey: self.journey(comments, signals),
            concerns: self.concerns(comments),
            highlights: self.highlights(comments, signals),
        }
    }

    pub fn sentiment_overview(
        &self,
        comments: &[Comment],
        signals: &[CommentSignals],
    ) -> SentimentOverview {
        let total = signals.len();
        let count = |label: SentimentLabel| signals.iter().filter(|s| s.sentiment.label == label).count();
        let positive = count(SentimentLabel::Positive);
        let neutral = count(SentimentLabel::Neutral);
        let negative = count(SentimentLabel::Negative);

        let top_liked = most_liked(comments, 0..total, self.config.insights.top_liked_sample);
        let top_positive = top_liked
            .iter()
            .filter(|&&i| signals[i].sentiment.label == SentimentLabel::Positive)
            .count();

        SentimentOverview {
            total,
            positive,
            neutral,
            negative,
            positive_pct: percentage(positive, total),
            neutral_pct: percentage(neutral, total),
            negative_pct: percentage(negative, total),
            top_liked_positive_ratio: percentage(top_positive, top_liked.len()),
        }
    }

    /// Language groups by descending size; groups under the minimum support are dropped.
    pub fn languages(
        &self,
        comments: &[Comment],
        signals: &[CommentSignals],
    ) -> Vec<LanguageAggregate> {
        let mut order: Vec<Language> = Vec::new();
        let mut groups: HashMap<Language, GroupAccumulator> = HashMap::new();
        for (i, signal) in signals.iter().enumerate() {
            if !groups.contains_key(&signal.language) {
                order.push(signal.language);
            }
            groups
                .entry(signal.language)
                .or_default()
                .add(i, comments, signal.sentiment.label);
        }

        let mut aggregates: Vec<LanguageAggregate> = order
            .iter()
            .filter_map(|lang| {
                let acc = groups.get(lang)?;
                (acc.count >= self.config.min_language_support).then(|| {
                    acc.finish(lang.code(), lang.display_name(), signals.len(), comments)
                })
            })
            .collect();
        aggregates.sort_by(|a, b| b.count.cmp(&a.count));
        aggregates
    }

    /// One entry per taxonomy category, in taxonomy order, including empty ones.
    pub fn opinions(
        &self,
        comments: &[Comment],
        signals: &[CommentSignals],
    ) -> Vec<CategoryAggregate> {
        self.config
            .opinion_taxonomy
            .iter()
            .map(|category| {
                let mut acc = GroupAccumulator::default();
                for (i, signal) in signals.iter().enumerate() {
                    if signal.opinions.contains(&category.id) {
                        acc.add(i, comments, signal.sentiment.label);
                    }
                }
                acc.finish(&category.id, &category.display_name, signals.len(), comments)
            })
            .collect()
    }

    /// One entry per configured stage in funnel order, followed by `unknown`.
    pub fn journey(
        &self,
        comments: &[Comment],
        signals: &[CommentSignals],
    ) -> Vec<JourneyAggregate> {
        let stages = &self.config.journey_stages;
        let mut accs: Vec<GroupAccumulator> =
            (0..=stages.len()).map(|_| GroupAccumulator::default()).collect();
        for (i, signal) in signals.iter().enumerate() {
            let slot = match &signal.journey {
                JourneyStage::Stage(id) => stages.iter().position(|s| &s.id == id),
                JourneyStage::Unknown => None,
            }
            .unwrap_or(stages.len());
            accs[slot].add(i, comments, signal.sentiment.label);
        }

        let mut aggregates: Vec<JourneyAggregate> = stages
            .iter()
            .zip(&accs)
            .map(|(stage, acc)| acc.finish(&stage.id, &stage.display_name, signals.len(), comments))
            .collect();
        aggregates.push(accs[stages.len()].finish(
            JourneyStage::UNKNOWN_ID,
            &self.config.journey_unknown_name,
            signals.len(),
            comments,
        ));
        aggregates
    }

    pub fn concerns(&self, comments: &[Comment]) -> ConcernTallies {
        let mut expectation = 0;
        let mut anxiety = 0;
        for comment in comments {
            let lowered = comment.text.to_lowercase();
            if mentions_any(&lowered, &self.expectation_keywords) {
                expectation += 1;
            }
            if mentions_any(&lowered, &self.anxiety_keywords) {
                anxiety += 1;
            }
        }
        ConcernTallies {
            expectation,
            anxiety,
            expectation_pct: percentage(expectation, comments.len()),
            anxiety_pct: percentage(anxiety, comments.len()),
        }
    }

    pub fn highlights(&self, comments: &[Comment], signals: &[CommentSignals]) -> Highlights {
        let settings = &self.config.insights;
        let pick = |label: SentimentLabel| -> Vec<ExampleComment> {
            let members = signals
                .iter()
                .enumerate()
                .filter(|(_, s)| s.sentiment.label == label)
                .map(|(i, _)| i);
            most_liked(comments, members, settings.highlight_count)
                .into_iter()
                .map(|i| ExampleComment::truncated(&comments[i], settings.highlight_chars))
                .collect()
        };
        Highlights {
            positive: pick(SentimentLabel::Positive),
            negative: pick(SentimentLabel::Negative),
        }
    }
}

/// Indices of the `n` most liked comments among `members`; ties keep insertion order.
fn most_liked(comments: &[Comment], members: impl Iterator<Item = usize>, n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = members.collect();
    indices.sort_by(|&a, &b| comments[b].like_count.cmp(&comments[a].like_count));
    indices.truncate(n);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OpinionTags, SentimentResult};

    fn signal(label: SentimentLabel, language: Language, opinions: &[&str], stage: Option<&str>) -> CommentSignals {
        let mut tags = OpinionTags::new();
        for o in opinions {
            tags.insert(o);
        }
        CommentSignals {
            sentiment: SentimentResult { label, score: 0.0 },
            language,
            opinions: tags,
            journey: stage
                .map(|s| JourneyStage::Stage(s.to_string()))
                .unwrap_or(JourneyStage::Unknown),
        }
    }

    fn batch(n: usize) -> Vec<Comment> {
        (0..n).map(|i| Comment::new(format!("c{}", i), "댓글", (i % 4) as u64)).collect()
    }

    #[test]
    fn test_empty_batch_reports_zero_counts() {
        let config = AnalyzerConfig::default();
        let agg = AggregationEngine::new(&config).aggregate(&[], &[]);
        assert_eq!(agg.total, 0);
        assert_eq!(agg.sentiment, SentimentOverview::default());
        assert!(agg.languages.is_empty());
        assert_eq!(agg.opinions.len(), config.opinion_taxonomy.len());
        assert!(agg.opinions.iter().all(|o| o.count == 0 && o.percentage == 0.0));
        assert_eq!(agg.journey.len(), config.journey_stages.len() + 1);
        assert!(agg.journey.iter().all(|j| j.count == 0 && j.representative_example.is_none()));
        assert_eq!(agg.concerns, ConcernTallies::default());
        assert!(agg.highlights.positive.is_empty());
    }

    #[test]
    fn test_representative_is_most_liked_first_on_ties() {
        let config = AnalyzerConfig::default();
        let comments = vec![
            Comment::new("a", "x", 5),
            Comment::new("b", "y", 9),
            Comment::new("c", "z", 9),
        ];
        let signals: Vec<CommentSignals> = (0..3)
            .map(|_| signal(SentimentLabel::Positive, Language::Korean, &["product_service"], Some("purchase")))
            .collect();
        let agg = AggregationEngine::new(&config).aggregate(&comments, &signals);
        let product = agg.opinions.iter().find(|o| o.key == "product_service").unwrap();
        assert_eq!(product.count, 3);
        assert_eq!(product.representative_example.as_ref().unwrap().id, "b");
        assert_eq!(product.positive_pct, 100.0);
    }

    #[test]
    fn test_journey_percentages_sum_to_hundred() {
        let config = AnalyzerConfig::default();
        let comments = batch(7);
        let stages = [Some("awareness"), Some("purchase"), None, Some("purchase"), None, Some("advocacy"), Some("interest")];
        let signals: Vec<CommentSignals> = stages
            .iter()
            .map(|s| signal(SentimentLabel::Neutral, Language::Korean, &["general_reaction"], *s))
            .collect();
        let agg = AggregationEngine::new(&config).aggregate(&comments, &signals);
        let sum: f64 = agg.journey.iter().map(|j| j.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(agg.journey.iter().map(|j| j.count).sum::<usize>(), 7);
        let unknown = agg.journey.last().unwrap();
        assert_eq!(unknown.key, "unknown");
        assert_eq!(unknown.label, "미분류");
        assert_eq!(unknown.count, 2);
    }

    #[test]
    fn test_unknown_stage_label_comes_from_config() {
        let config = AnalyzerConfig::from_json_str(r#"{"journey_unknown_name": "Unclassified"}"#).unwrap();
        let comments = batch(2);
        let signals: Vec<CommentSignals> = (0..2)
            .map(|_| signal(SentimentLabel::Neutral, Language::English, &["general_reaction"], None))
            .collect();
        let agg = AggregationEngine::new(&config).aggregate(&comments, &signals);
        let unknown = agg.journey.last().unwrap();
        assert_eq!(unknown.key, "unknown");
        assert_eq!(unknown.label, "Unclassified");
        assert_eq!(unknown.percentage, 100.0);
    }

    #[test]
    fn test_small_language_groups_are_suppressed() {
        let config = AnalyzerConfig::default();
        let comments = batch(8);
        let mut signals: Vec<CommentSignals> = (0..6)
            .map(|_| signal(SentimentLabel::Neutral, Language::Korean, &[], None))
            .collect();
        signals.push(signal(SentimentLabel::Neutral, Language::English, &[], None));
        signals.push(signal(SentimentLabel::Neutral, Language::Japanese, &[], None));

        let agg = AggregationEngine::new(&config).aggregate(&comments, &signals);
        assert_eq!(agg.languages.len(), 1);
        assert_eq!(agg.languages[0].key, "korean");
        assert_eq!(agg.languages[0].count, 6);
        assert_eq!(agg.languages[0].percentage, 75.0);
        assert!(agg.languages.iter().map(|l| l.count).sum::<usize>() <= comments.len());
    }

    #[test]
    fn test_sentiment_overview_and_top_liked_ratio() {
        let config = AnalyzerConfig::default();
        let comments = vec![
            Comment::new("a", "x", 100),
            Comment::new("b", "y", 50),
            Comment::new("c", "z", 1),
            Comment::new("d", "w", 0),
        ];
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
        ];
        let signals: Vec<CommentSignals> = labels
            .iter()
            .map(|l| signal(*l, Language::Korean, &[], None))
            .collect();
        let overview = AggregationEngine::new(&config).sentiment_overview(&comments, &signals);
        assert_eq!(overview.positive, 2);
        assert_eq!(overview.negative, 1);
        assert_eq!(overview.neutral, 1);
        assert_eq!(overview.positive_pct, 50.0);
        assert_eq!(overview.negative_pct, 25.0);
        assert_eq!(overview.top_liked_positive_ratio, 50.0);
    }

    #[test]
    fn test_concern_tallies_are_independent() {
        let config = AnalyzerConfig::default();
        let comments = vec![
            Comment::new("a", "출시 언제 하나요? 기대돼요", 0),
            Comment::new("b", "기대되지만 가격이 비싸서 걱정", 0),
            Comment::new("c", "그냥 그랬음", 0),
            Comment::new("d", "WORRIED about this", 0),
        ];
        let tallies = AggregationEngine::new(&config).concerns(&comments);
        assert_eq!(tallies.expectation, 2);
        assert_eq!(tallies.anxiety, 2);
        assert_eq!(tallies.expectation_pct, 50.0);
    }

    #[test]
    fn test_highlights_pick_most_liked_per_polarity() {
        let config = AnalyzerConfig::default();
        let long_text = "좋".repeat(150);
        let comments = vec![
            Comment::new("a", "좋아요", 3),
            Comment::new("b", long_text, 10),
            Comment::new("c", "최고", 7),
            Comment::new("d", "별로", 2),
            Comment::new("e", "좋네", 1),
        ];
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Positive,
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Positive,
        ];
        let signals: Vec<CommentSignals> = labels
            .iter()
            .map(|l| signal(*l, Language::Korean, &[], None))
            .collect();
        let highlights = AggregationEngine::new(&config).highlights(&comments, &signals);
        let ids: Vec<&str> = highlights.positive.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(highlights.positive[0].text.chars().count(), 103);
        assert_eq!(highlights.negative.len(), 1);
        assert_eq!(highlights.negative[0].id, "d");
    }
}
