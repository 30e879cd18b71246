//! Templated insight statements and action items.
//!
//! Both outputs come from ordered rule tables: each rule pairs a predicate over the
//! batch aggregates with a template, and rules are evaluated top to bottom. New bands
//! are added by pushing rules, not by editing control flow. Funnel guidance rules are
//! generated from the `journey_guidance` config table.

use crate::aggregate::Aggregates;
use crate::config::{AnalyzerConfig, InsightThresholds, JourneyGuidance};
use crate::models::{CategoryAggregate, InsightStatement, JourneyAggregate, KeywordEntry};

/// Read-only view handed to every rule.
pub struct InsightContext<'a> {
    pub aggregates: &'a Aggregates,
    pub keywords: &'a [KeywordEntry],
    pub config: &'a AnalyzerConfig,
}

impl<'a> InsightContext<'a> {
    pub fn new(
        aggregates: &'a Aggregates,
        keywords: &'a [KeywordEntry],
        config: &'a AnalyzerConfig,
    ) -> Self {
        Self {
            aggregates,
            keywords,
            config,
        }
    }

    pub fn thresholds(&self) -> &InsightThresholds {
        &self.config.insights
    }

    pub fn has_comments(&self) -> bool {
        self.aggregates.total > 0
    }

    pub fn positive_pct(&self) -> f64 {
        self.aggregates.sentiment.positive_pct
    }

    pub fn negative_pct(&self) -> f64 {
        self.aggregates.sentiment.negative_pct
    }

    /// Largest opinion category other than the fallback; ties go to taxonomy order.
    pub fn top_category(&self) -> Option<&CategoryAggregate> {
        let fallback = self.config.opinion_fallback.as_deref();
        let mut best: Option<&CategoryAggregate> = None;
        for category in &self.aggregates.opinions {
            if Some(category.key.as_str()) == fallback || category.count == 0 {
                continue;
            }
            if best.map_or(true, |b| category.count > b.count) {
                best = Some(category);
            }
        }
        best
    }

    pub fn stage(&self, id: &str) -> Option<&JourneyAggregate> {
        self.aggregates.journey.iter().find(|j| j.key == id)
    }

    fn keyword_sample(&self) -> Vec<&str> {
        self.keywords
            .iter()
            .take(self.thresholds().keyword_sample)
            .map(|k| k.term.as_str())
            .collect()
    }
}

type Predicate = Box<dyn Fn(&InsightContext<'_>) -> bool + Send + Sync>;
type StatementTemplate = Box<dyn Fn(&InsightContext<'_>) -> InsightStatement + Send + Sync>;
type ActionTemplate = Box<dyn Fn(&InsightContext<'_>) -> String + Send + Sync>;

pub struct InsightRule {
    pub id: String,
    predicate: Predicate,
    template: StatementTemplate,
}

impl InsightRule {
    pub fn new<P, T>(id: impl Into<String>, predicate: P, template: T) -> Self
    where
        P: Fn(&InsightContext<'_>) -> bool + Send + Sync + 'static,
        T: Fn(&InsightContext<'_>) -> InsightStatement + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            predicate: Box::new(predicate),
            template: Box::new(template),
        }
    }

    pub fn applies(&self, ctx: &InsightContext<'_>) -> bool {
        (self.predicate)(ctx)
    }

    pub fn render(&self, ctx: &InsightContext<'_>) -> InsightStatement {
        (self.template)(ctx)
    }
}

pub struct ActionRule {
    pub id: String,
    predicate: Predicate,
    template: ActionTemplate,
}

impl ActionRule {
    pub fn new<P, T>(id: impl Into<String>, predicate: P, template: T) -> Self
    where
        P: Fn(&InsightContext<'_>) -> bool + Send + Sync + 'static,
        T: Fn(&InsightContext<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            predicate: Box::new(predicate),
            template: Box::new(template),
        }
    }
}

fn statement(id: &str, title: String, body: String, action: String) -> InsightStatement {
    InsightStatement {
        id: id.to_string(),
        title,
        body,
        recommended_action: action,
    }
}

pub struct InsightSynthesizer {
    rules: Vec<InsightRule>,
    actions: Vec<ActionRule>,
}

impl InsightSynthesizer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            rules: default_rules(&config.journey_guidance),
            actions: default_action_rules(),
        }
    }

    pub fn with_rules(rules: Vec<InsightRule>, actions: Vec<ActionRule>) -> Self {
        Self { rules, actions }
    }

    pub fn push_rule(&mut self, rule: InsightRule) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn synthesize(&self, ctx: &InsightContext<'_>) -> Vec<InsightStatement> {
        self.rules
            .iter()
            .filter(|rule| rule.applies(ctx))
            .map(|rule| rule.render(ctx))
            .collect()
    }

    pub fn action_items(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        self.actions
            .iter()
            .filter(|rule| (rule.predicate)(ctx))
            .map(|rule| (rule.template)(ctx))
            .collect()
    }
}

// ============================================================================
// Built-in tables
// ============================================================================

pub fn default_rules(guidance: &[JourneyGuidance]) -> Vec<InsightRule> {
    let mut rules = vec![
        InsightRule::new(
            "strong_positive",
            |ctx| ctx.has_comments() && ctx.positive_pct() > ctx.thresholds().strong_positive,
            |ctx| {
                statement(
                    "strong_positive",
                    "강한 팬덤 기반의 긍정 바이럴 잠재력".to_string(),
                    format!(
                        "전체 댓글의 {:.0}%가 긍정 반응입니다. 좋아요 상위 댓글의 {:.0}%가 긍정으로, 여론을 주도하는 층이 우호적입니다.",
                        ctx.positive_pct(),
                        ctx.aggregates.sentiment.top_liked_positive_ratio
                    ),
                    "팬이 직접 홍보에 참여하는 UGC 캠페인과 참여형 챌린지 기획".to_string(),
                )
            },
        ),
        InsightRule::new(
            "moderate_positive",
            |ctx| {
                let t = ctx.thresholds();
                ctx.has_comments()
                    && ctx.positive_pct() > t.moderate_positive
                    && ctx.positive_pct() <= t.strong_positive
            },
            |ctx| {
                statement(
                    "moderate_positive",
                    "호의적이지만 열성 팬으로 전환되지 않은 층".to_string(),
                    format!(
                        "긍정 비율 {:.0}%는 양호하지만, 가볍게 호감을 가진 시청자가 많을 가능성이 높습니다.",
                        ctx.positive_pct()
                    ),
                    "비하인드, 팬서비스 콘텐츠 등 정기적인 접점으로 관계를 심화".to_string(),
                )
            },
        ),
        InsightRule::new(
            "weak_positive",
            |ctx| ctx.has_comments() && ctx.positive_pct() <= ctx.thresholds().moderate_positive,
            |ctx| {
                statement(
                    "weak_positive",
                    "긍정 반응이 약함".to_string(),
                    format!(
                        "긍정 비율이 {:.0}%에 그쳐 시청자의 호응을 충분히 이끌어내지 못했습니다.",
                        ctx.positive_pct()
                    ),
                    "좋아요 상위 댓글의 반응을 참고해 메시지와 연출 방향을 재점검".to_string(),
                )
            },
        ),
        InsightRule::new(
            "negative_warning",
            |ctx| ctx.has_comments() && ctx.negative_pct() > ctx.thresholds().negative_warning,
            |ctx| {
                statement(
                    "negative_warning",
                    "부정 여론의 핵심 불만 파악 필요".to_string(),
                    format!(
                        "부정 반응이 {:.0}%로 무시할 수 없는 수준입니다. 콘텐츠 품질 문제인지 기대와의 괴리인지 확인이 필요합니다.",
                        ctx.negative_pct()
                    ),
                    "부정 댓글 키워드를 분석해 해명 또는 개선이 필요한 영역 식별".to_string(),
                )
            },
        ),
        InsightRule::new(
            "keyword_usage",
            |ctx| !ctx.keywords.is_empty(),
            |ctx| {
                let sample = ctx.keyword_sample();
                let lead: Vec<&str> = sample.iter().take(2).copied().collect();
                statement(
                    "keyword_usage",
                    "시청자의 언어로 말하기".to_string(),
                    format!(
                        "가장 많이 언급된 키워드: \"{}\". 마케팅 메시지, 썸네일, 제목에 활용하면 공감을 얻기 쉽습니다.",
                        sample.join(", ")
                    ),
                    format!("다음 콘텐츠에 \"{}\" 키워드를 전략적으로 활용", lead.join("\", \"")),
                )
            },
        ),
        InsightRule::new(
            "dominant_opinion",
            |ctx| {
                ctx.top_category()
                    .map_or(false, |c| c.percentage >= ctx.thresholds().category_concentration)
            },
            |ctx| {
                let (label, pct, pos, neg) = ctx
                    .top_category()
                    .map(|c| (c.label.as_str(), c.percentage, c.positive_pct, c.negative_pct))
                    .unwrap_or_default();
                statement(
                    "dominant_opinion",
                    format!("\"{}\" 주제가 대화를 주도", label),
                    format!(
                        "전체 댓글의 {:.0}%가 이 주제를 언급하며, 그중 긍정 {:.0}%, 부정 {:.0}%입니다.",
                        pct, pos, neg
                    ),
                    format!("\"{}\" 주제로 후속 콘텐츠를 기획하면 높은 참여가 예상됨", label),
                )
            },
        ),
    ];

    for g in guidance {
        let band = g.clone();
        let id = format!("journey_{}", g.stage);
        let rule_id = id.clone();
        let stage = g.stage.clone();
        let min = g.min_percentage;
        rules.push(InsightRule::new(
            id,
            move |ctx| {
                ctx.has_comments()
                    && ctx.stage(&stage).map_or(false, |s| s.count > 0 && s.percentage >= min)
            },
            move |ctx| {
                let pct = ctx.stage(&band.stage).map(|s| s.percentage).unwrap_or(0.0);
                statement(
                    &rule_id,
                    band.title.clone(),
                    band.body.replace("{pct}", &format!("{:.0}", pct)),
                    band.action.clone(),
                )
            },
        ));
    }

    rules.push(InsightRule::new(
        "expectation",
        |ctx| {
            ctx.aggregates.concerns.expectation > 0
                && ctx.aggregates.concerns.expectation_pct >= ctx.thresholds().concern_share
        },
        |ctx| {
            let c = &ctx.aggregates.concerns;
            statement(
                "expectation",
                "후속 콘텐츠에 대한 기대감".to_string(),
                format!(
                    "댓글의 {:.0}%({}개)가 출시나 다음 콘텐츠에 대한 기대를 드러냅니다.",
                    c.expectation_pct, c.expectation
                ),
                "공개 일정과 티저를 미리 안내해 기대감을 유지".to_string(),
            )
        },
    ));
    rules.push(InsightRule::new(
        "anxiety",
        |ctx| {
            ctx.aggregates.concerns.anxiety > 0
                && ctx.aggregates.concerns.anxiety_pct >= ctx.thresholds().concern_share
        },
        |ctx| {
            let c = &ctx.aggregates.concerns;
            statement(
                "anxiety",
                "우려 섞인 반응 존재".to_string(),
                format!(
                    "댓글의 {:.0}%({}개)가 걱정이나 불안을 표현합니다.",
                    c.anxiety_pct, c.anxiety
                ),
                "자주 언급되는 우려 사항에 대해 선제적으로 설명".to_string(),
            )
        },
    ));

    rules
}

pub fn default_action_rules() -> Vec<ActionRule> {
    vec![
        ActionRule::new(
            "engagement",
            |ctx| ctx.has_comments() && ctx.positive_pct() > ctx.thresholds().engagement_positive,
            |_| "팬 참여형 콘텐츠(Q&A, 투표, 챌린지)로 참여도 극대화".to_string(),
        ),
        ActionRule::new(
            "preemptive_faq",
            |ctx| ctx.has_comments() && ctx.negative_pct() > ctx.thresholds().negative_warning,
            |_| "부정 댓글 패턴을 분석해 FAQ나 공지 형태로 선제 커뮤니케이션".to_string(),
        ),
        ActionRule::new(
            "expand_topic",
            |ctx| ctx.top_category().is_some(),
            |ctx| {
                let label = ctx.top_category().map(|c| c.label.as_str()).unwrap_or_default();
                format!("\"{}\" 주제를 확장한 콘텐츠로 시청자 관심 유지", label)
            },
        ),
        ActionRule::new(
            "keyword_ab_test",
            |ctx| !ctx.keywords.is_empty(),
            |ctx| {
                let term = ctx.keywords.first().map(|k| k.term.as_str()).unwrap_or_default();
                format!("\"{}\" 키워드를 활용한 썸네일/제목 A/B 테스트", term)
            },
        ),
        ActionRule::new(
            "ambassador",
            |ctx| ctx.has_comments(),
            |_| "반복 댓글을 남기는 열성 팬을 식별해 앰배서더/VIP 프로그램 대상으로 관리".to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupAggregate, SentimentOverview};

    fn aggregates(total: usize, positive_pct: f64, negative_pct: f64) -> Aggregates {
        Aggregates {
            total,
            sentiment: SentimentOverview {
                total,
                positive_pct,
                negative_pct,
                ..SentimentOverview::default()
            },
            ..Aggregates::default()
        }
    }

    fn group(key: &str, label: &str, count: usize, percentage: f64) -> GroupAggregate {
        GroupAggregate {
            key: key.to_string(),
            label: label.to_string(),
            count,
            percentage,
            positive_pct: 50.0,
            negative_pct: 10.0,
            representative_example: None,
        }
    }

    fn ids(statements: &[InsightStatement]) -> Vec<&str> {
        statements.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_positive_bands_are_exclusive() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        for (pos, expected) in [
            (75.0, "strong_positive"),
            (60.0, "moderate_positive"),
            (50.0, "moderate_positive"),
            (40.0, "weak_positive"),
            (10.0, "weak_positive"),
        ] {
            let agg = aggregates(10, pos, 0.0);
            let out = synth.synthesize(&InsightContext::new(&agg, &[], &config));
            assert_eq!(ids(&out), vec![expected], "positive_pct={}", pos);
        }
    }

    #[test]
    fn test_negative_warning_is_appended_independently() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        let agg = aggregates(10, 70.0, 25.0);
        let out = synth.synthesize(&InsightContext::new(&agg, &[], &config));
        assert_eq!(ids(&out), vec!["strong_positive", "negative_warning"]);
        assert!(out[1].body.contains("25%"));
    }

    #[test]
    fn test_keyword_statement_quotes_top_terms() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        let agg = aggregates(10, 50.0, 0.0);
        let keywords: Vec<KeywordEntry> = ["노래", "무대", "음색"]
            .iter()
            .map(|t| KeywordEntry {
                term: t.to_string(),
                count: 2,
                weight: 2.0,
            })
            .collect();
        let out = synth.synthesize(&InsightContext::new(&agg, &keywords, &config));
        let kw = out.iter().find(|s| s.id == "keyword_usage").unwrap();
        assert!(kw.body.contains("노래, 무대, 음색"));
        assert!(kw.recommended_action.contains("\"노래\", \"무대\""));
    }

    #[test]
    fn test_empty_batch_yields_no_statements() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        let agg = Aggregates::default();
        let ctx = InsightContext::new(&agg, &[], &config);
        assert!(synth.synthesize(&ctx).is_empty());
        assert!(synth.action_items(&ctx).is_empty());
    }

    #[test]
    fn test_dominant_opinion_ignores_fallback_category() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        let mut agg = aggregates(20, 50.0, 0.0);
        agg.opinions = vec![
            group("model_appearance", "모델/비주얼", 6, 30.0),
            group("product_service", "제품/서비스", 3, 15.0),
            group("general_reaction", "일반 반응", 14, 70.0),
        ];
        let ctx = InsightContext::new(&agg, &[], &config);
        assert_eq!(ctx.top_category().unwrap().key, "model_appearance");
        let out = synth.synthesize(&ctx);
        let dominant = out.iter().find(|s| s.id == "dominant_opinion").unwrap();
        assert!(dominant.title.contains("모델/비주얼"));
    }

    #[test]
    fn test_journey_guidance_uses_configured_bands() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        let mut agg = aggregates(10, 50.0, 0.0);
        agg.journey = vec![
            group("awareness", "인지", 4, 40.0),
            group("consideration", "고려", 1, 10.0),
            group("unknown", "미분류", 5, 50.0),
        ];
        let out = synth.synthesize(&InsightContext::new(&agg, &[], &config));
        let journey: Vec<&InsightStatement> =
            out.iter().filter(|s| s.id.starts_with("journey_")).collect();
        assert_eq!(journey.len(), 1);
        assert_eq!(journey[0].id, "journey_awareness");
        assert!(journey[0].body.contains("40%"));
    }

    #[test]
    fn test_custom_rule_table() {
        let config = AnalyzerConfig::default();
        let mut synth = InsightSynthesizer::with_rules(Vec::new(), Vec::new());
        synth.push_rule(InsightRule::new(
            "always",
            |_| true,
            |_| statement("always", "t".to_string(), "b".to_string(), "a".to_string()),
        ));
        assert_eq!(synth.rule_ids(), vec!["always"]);
        let agg = Aggregates::default();
        let out = synth.synthesize(&InsightContext::new(&agg, &[], &config));
        assert_eq!(ids(&out), vec!["always"]);
    }

    #[test]
    fn test_action_items_follow_table_order() {
        let config = AnalyzerConfig::default();
        let synth = InsightSynthesizer::new(&config);
        let mut agg = aggregates(10, 55.0, 30.0);
        agg.opinions = vec![group("product_service", "제품/서비스", 3, 30.0)];
        let keywords = vec![KeywordEntry {
            term: "가격".to_string(),
            count: 3,
            weight: 3.0,
        }];
        let actions = synth.action_items(&InsightContext::new(&agg, &keywords, &config));
        assert_eq!(actions.len(), 5);
        assert!(actions[2].contains("제품/서비스"));
        assert!(actions[3].contains("\"가격\""));
    }
}
