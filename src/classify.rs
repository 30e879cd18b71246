//! Keyword-set classifiers over case-folded comment text.
//!
//! - `OpinionClassifier`: multi-label, every category with a matching keyword
//! - `JourneyClassifier`: single funnel stage by keyword count, first stage wins ties

use crate::config::{AnalyzerConfig, KeywordGroup};
use crate::models::{JourneyStage, OpinionTags};

#[derive(Debug, Clone)]
struct CompiledGroup {
    id: String,
    keywords: Vec<String>,
}

fn compile(groups: &[KeywordGroup]) -> Vec<CompiledGroup> {
    groups
        .iter()
        .map(|g| CompiledGroup {
            id: g.id.clone(),
            keywords: g
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        })
        .collect()
}

/// True when any keyword is a substring of `lowered`; stops at the first hit.
pub fn mentions_any<S: AsRef<str>>(lowered: &str, keywords: &[S]) -> bool {
    keywords.iter().any(|k| lowered.contains(k.as_ref()))
}

#[derive(Debug, Clone)]
pub struct OpinionClassifier {
    categories: Vec<CompiledGroup>,
    fallback: Option<String>,
}

impl OpinionClassifier {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::from_groups(&config.opinion_taxonomy, config.opinion_fallback.clone())
    }

    pub fn from_groups(taxonomy: &[KeywordGroup], fallback: Option<String>) -> Self {
        Self {
            categories: compile(taxonomy),
            fallback,
        }
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Categories in taxonomy order. With no match the fallback category is assigned
    /// alone, which inflates that category's share of the batch.
    pub fn classify(&self, text: &str) -> OpinionTags {
        let lowered = text.to_lowercase();
        let mut tags = OpinionTags::new();
        for category in &self.categories {
            if mentions_any(&lowered, &category.keywords) {
                tags.insert(&category.id);
            }
        }
        if tags.is_empty() {
            if let Some(fallback) = &self.fallback {
                tags.insert(fallback);
            }
        }
        tags
    }
}

#[derive(Debug, Clone)]
pub struct JourneyClassifier {
    stages: Vec<CompiledGroup>,
}

impl JourneyClassifier {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::from_groups(&config.journey_stages)
    }

    pub fn from_groups(stages: &[KeywordGroup]) -> Self {
        Self {
            stages: compile(stages),
        }
    }

    /// Number of distinct stage keywords found in the text, per stage in table order.
    pub fn scores(&self, text: &str) -> Vec<(&str, usize)> {
        let lowered = text.to_lowercase();
        self.stages
            .iter()
            .map(|stage| {
                let score = stage
                    .keywords
                    .iter()
                    .filter(|k| lowered.contains(k.as_str()))
                    .count();
                (stage.id.as_str(), score)
            })
            .collect()
    }

    pub fn classify(&self, text: &str) -> JourneyStage {
        let mut best: Option<(&str, usize)> = None;
        for (id, score) in self.scores(text) {
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((id, score));
            }
        }
        match best {
            Some((id, _)) => JourneyStage::Stage(id.to_string()),
            None => JourneyStage::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig::default()
    }

    #[test]
    fn test_opinion_is_multi_label() {
        let classifier = OpinionClassifier::new(&config());
        let tags = classifier.classify("모델 얼굴이 너무 예쁘고 가격도 착하네요");
        assert!(tags.contains("model_appearance"));
        assert!(tags.contains("product_service"));
        assert!(!tags.contains("general_reaction"));
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec!["model_appearance", "product_service"]
        );
    }

    #[test]
    fn test_opinion_matching_is_case_folded() {
        let classifier = OpinionClassifier::new(&config());
        assert!(classifier.classify("The PRICE is fine").contains("product_service"));
    }

    #[test]
    fn test_opinion_unmatched_gets_fallback() {
        let classifier = OpinionClassifier::new(&config());
        let tags = classifier.classify("그냥 그랬음");
        assert_eq!(tags, OpinionTags::single("general_reaction"));
        assert_eq!(classifier.classify(""), OpinionTags::single("general_reaction"));
    }

    #[test]
    fn test_opinion_fallback_can_be_turned_off() {
        let cfg = config();
        let classifier = OpinionClassifier::from_groups(&cfg.opinion_taxonomy, None);
        assert!(classifier.classify("그냥 그랬음").is_empty());
        assert!(classifier.fallback().is_none());
    }

    #[test]
    fn test_journey_picks_highest_scoring_stage() {
        let classifier = JourneyClassifier::new(&config());
        assert_eq!(
            classifier.classify("어제 주문했는데 결제까지 완료"),
            JourneyStage::Stage("purchase".to_string())
        );
        assert_eq!(
            classifier.classify("후기 보고 살까 고민중"),
            JourneyStage::Stage("consideration".to_string())
        );
        assert_eq!(classifier.classify("그냥 그랬음"), JourneyStage::Unknown);
        assert_eq!(classifier.classify(""), JourneyStage::Unknown);
    }

    #[test]
    fn test_journey_tie_goes_to_first_stage_in_table() {
        let stages = vec![
            KeywordGroup::new("interest", "관심", &["궁금"]),
            KeywordGroup::new("purchase", "구매", &["샀"]),
        ];
        let text = "궁금해서 샀어요";
        assert_eq!(
            JourneyClassifier::from_groups(&stages).classify(text),
            JourneyStage::Stage("interest".to_string())
        );

        let reversed: Vec<KeywordGroup> = stages.into_iter().rev().collect();
        assert_eq!(
            JourneyClassifier::from_groups(&reversed).classify(text),
            JourneyStage::Stage("purchase".to_string())
        );
    }

    #[test]
    fn test_mentions_any() {
        assert!(mentions_any("출시 언제 하나요", &["기대", "언제"]));
        assert!(!mentions_any("좋아요", &["기대", "언제"]));
        assert!(!mentions_any::<&str>("좋아요", &[]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_opinion_never_empty(text in ".{1,40}") {
            let classifier = OpinionClassifier::new(&config());
            prop_assert!(!classifier.classify(&text).is_empty());
        }

        #[test]
        fn prop_unique_max_stage_is_order_independent(
            words in proptest::collection::vec(
                prop_oneof![
                    Just("궁금"), Just("관심"), Just("샀"), Just("주문"), Just("결제"),
                    Just("추천"), Just("고민"), Just("그냥"), Just("날씨"),
                ],
                0..8,
            ),
            rotate in 0usize..5,
        ) {
            let stages = config().journey_stages;
            let text = words.join(" ");
            let forward = JourneyClassifier::from_groups(&stages);
            let mut rotated = stages.clone();
            rotated.rotate_left(rotate % stages.len());
            let permuted = JourneyClassifier::from_groups(&rotated);

            let scores = forward.scores(&text);
            let max = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
            let leaders = scores.iter().filter(|(_, s)| *s == max).count();
            if max > 0 && leaders == 1 {
                prop_assert_eq!(forward.classify(&text), permuted.classify(&text));
            }
            prop_assert_eq!(forward.classify(&text), forward.classify(&text));
        }
    }
}
