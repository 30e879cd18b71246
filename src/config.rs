//! Analyzer configuration: lexicons, taxonomies and thresholds.
//!
//! Everything that decides a classification outcome lives here as data so a new
//! market can be supported by swapping a JSON file:
//! - Stop terms for keyword extraction
//! - Sentiment lexicon (words, emoji, laughter, interjections, punctuation)
//! - Opinion taxonomy and journey stage table (ordered)
//! - Expectation / anxiety keyword lists
//! - Sentiment, keyword and insight thresholds
//!
//! The built-in default targets Korean language comment sections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AnalyzerError, Result};
use crate::matcher::MatchMode;

/// Environment variable pointing at a JSON configuration override.
pub const CONFIG_ENV: &str = "COMMENT_LENS_CONFIG";

/// Process-wide built-in configuration, shared read-only.
pub static DEFAULT_CONFIG: Lazy<AnalyzerConfig> = Lazy::new(AnalyzerConfig::default);

// ============================================================================
// Tables
// ============================================================================

/// One entry of the opinion taxonomy or the journey stage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub id: String,
    pub display_name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(id: &str, display_name: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            keywords: to_strings(keywords),
        }
    }
}

/// Funnel guidance emitted when a journey stage holds at least `min_percentage` of the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyGuidance {
    pub stage: String,
    pub min_percentage: f64,
    pub title: String,
    pub body: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMode {
    /// Plain term frequency.
    #[default]
    Frequency,
    /// Mean TF-IDF re-ranking, degrading to frequency on small batches.
    Weighted,
}

// ============================================================================
// Thresholds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentThresholds {
    /// Scores strictly above this are positive.
    pub positive: f64,
    /// Scores strictly below this are negative.
    pub negative: f64,
    pub emoji_weight: f64,
    pub lexical_smoothing: f64,
    pub laughter_weight: f64,
    pub laughter_cap: usize,
    pub interjection_bonus: f64,
    pub exclamation_bonus: f64,
    pub exclamation_min: usize,
    pub negative_punctuation_penalty: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: 0.15,
            negative: -0.2,
            emoji_weight: 1.5,
            lexical_smoothing: 0.5,
            laughter_weight: 0.4,
            laughter_cap: 3,
            interjection_bonus: 0.3,
            exclamation_bonus: 0.2,
            exclamation_min: 2,
            negative_punctuation_penalty: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSettings {
    pub top_n: usize,
    pub mode: KeywordMode,
    /// Comments shorter than this (in characters) are not fed to the extractor.
    pub min_comment_length: usize,
    /// Minimum number of non-empty documents before weighted mode kicks in.
    pub weighted_min_documents: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub max_features: usize,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            top_n: 30,
            mode: KeywordMode::Frequency,
            min_comment_length: 2,
            weighted_min_documents: 10,
            min_df: 2,
            max_df: 0.85,
            max_features: 2000,
        }
    }
}

/// Percentage bands driving the insight and action item tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    pub strong_positive: f64,
    pub moderate_positive: f64,
    pub negative_warning: f64,
    pub engagement_positive: f64,
    pub category_concentration: f64,
    pub concern_share: f64,
    /// How many of the most liked comments feed `top_liked_positive_ratio`.
    pub top_liked_sample: usize,
    pub highlight_count: usize,
    pub highlight_chars: usize,
    /// How many keywords the keyword-usage statement quotes.
    pub keyword_sample: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            strong_positive: 60.0,
            moderate_positive: 40.0,
            negative_warning: 20.0,
            engagement_positive: 50.0,
            category_concentration: 25.0,
            concern_share: 10.0,
            top_liked_sample: 20,
            highlight_count: 3,
            highlight_chars: 100,
            keyword_sample: 5,
        }
    }
}

// ============================================================================
// AnalyzerConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub stop_terms: Vec<String>,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub positive_emoji: Vec<String>,
    pub negative_emoji: Vec<String>,
    /// Characters whose runs (2+) count as laughter.
    pub laughter_chars: Vec<char>,
    /// Words that open an emphatic comment ("와 ", "wow ").
    pub interjections: Vec<String>,
    /// Regex for flatline / ellipsis / disapproval punctuation.
    pub negative_punctuation: String,
    /// How lexicon words are matched against comment tokens.
    pub lexical_match: MatchMode,
    pub opinion_taxonomy: Vec<KeywordGroup>,
    /// Category assigned when no taxonomy keyword matches; `None` leaves the set empty.
    pub opinion_fallback: Option<String>,
    pub journey_stages: Vec<KeywordGroup>,
    pub journey_guidance: Vec<JourneyGuidance>,
    /// Display name of the group for comments that match no stage.
    pub journey_unknown_name: String,
    pub expectation_keywords: Vec<String>,
    pub anxiety_keywords: Vec<String>,
    /// Language groups smaller than this are left out of the language aggregate.
    pub min_language_support: usize,
    /// Use the statistical language detector when it is compiled in.
    pub language_detector: bool,
    pub sentiment: SentimentThresholds,
    pub keywords: KeywordSettings,
    pub insights: InsightThresholds,
}

impl AnalyzerConfig {
    /// Loads a (possibly partial) configuration; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(
            "Loaded analyzer config - path={}, categories={}, stages={}",
            path.display(),
            config.opinion_taxonomy.len(),
            config.journey_stages.len()
        );
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `COMMENT_LENS_CONFIG` if set, otherwise returns the built-in defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim()),
            _ => {
                debug!("{} not set, using built-in config", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.sentiment;
        if s.negative >= s.positive {
            return Err(AnalyzerError::InvalidThreshold(format!(
                "negative threshold {} must be below positive threshold {}",
                s.negative, s.positive
            )));
        }
        if s.lexical_smoothing <= 0.0 {
            return Err(AnalyzerError::InvalidThreshold(
                "lexical_smoothing must be positive".to_string(),
            ));
        }
        let i = &self.insights;
        if i.moderate_positive > i.strong_positive {
            return Err(AnalyzerError::InvalidThreshold(format!(
                "moderate_positive {} exceeds strong_positive {}",
                i.moderate_positive, i.strong_positive
            )));
        }
        if let Some(fallback) = &self.opinion_fallback {
            if !self.opinion_taxonomy.iter().any(|c| &c.id == fallback) {
                return Err(AnalyzerError::UnknownFallback(fallback.clone()));
            }
        }
        if self.journey_stages.is_empty() {
            return Err(AnalyzerError::EmptyStageTable);
        }
        let k = &self.keywords;
        if !(k.max_df > 0.0 && k.max_df <= 1.0) {
            return Err(AnalyzerError::InvalidKeywordSettings(format!(
                "max_df must be in (0, 1], got {}",
                k.max_df
            )));
        }
        if k.min_df == 0 {
            return Err(AnalyzerError::InvalidKeywordSettings(
                "min_df must be at least 1".to_string(),
            ));
        }
        Regex::new(&self.negative_punctuation)
            .map_err(|e| AnalyzerError::invalid_pattern(&self.negative_punctuation, e))?;
        Ok(())
    }

    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.opinion_taxonomy
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.display_name.as_str())
    }

    pub fn stage_name(&self, id: &str) -> Option<&str> {
        self.journey_stages
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.display_name.as_str())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            stop_terms: to_strings(STOP_TERMS),
            positive_words: to_strings(POSITIVE_WORDS),
            negative_words: to_strings(NEGATIVE_WORDS),
            positive_emoji: to_strings(POSITIVE_EMOJI),
            negative_emoji: to_strings(NEGATIVE_EMOJI),
            laughter_chars: vec!['ㅋ', 'ㅎ'],
            interjections: to_strings(&["와", "우와", "와우", "헐", "대박", "오", "오오", "wow", "omg"]),
            negative_punctuation: r"ㅡㅡ+|;;+|\.{3,}|…|-_-".to_string(),
            lexical_match: MatchMode::Substring,
            opinion_taxonomy: default_taxonomy(),
            opinion_fallback: Some("general_reaction".to_string()),
            journey_stages: default_journey_stages(),
            journey_guidance: default_journey_guidance(),
            journey_unknown_name: "미분류".to_string(),
            expectation_keywords: to_strings(&[
                "기대", "빨리", "얼른", "언제", "기다", "출시", "컴백", "다음 편", "다음 영상",
                "나왔으면", "나오면", "can't wait", "waiting",
            ]),
            anxiety_keywords: to_strings(&[
                "걱정", "불안", "우려", "괜찮을까", "논란", "무섭", "비싸", "망할", "실망할",
                "혹시", "worried", "concern",
            ]),
            min_language_support: 5,
            language_detector: true,
            sentiment: SentimentThresholds::default(),
            keywords: KeywordSettings::default(),
            insights: InsightThresholds::default(),
        }
    }
}

// ============================================================================
// Built-in tables
// ============================================================================

const STOP_TERMS: &[&str] = &[
    "은", "는", "이", "가", "을", "를", "에", "에서", "의", "와", "과", "도", "만", "로", "으로",
    "하고", "그리고", "그런데", "하지만", "그래서", "그러나", "또한", "및", "등",
    "나", "너", "우리", "저", "이것", "저것", "그것", "여기", "저기", "거기",
    "하다", "되다", "있다", "없다", "같다", "보다", "알다", "싶다", "주다",
    "하는", "하면", "해서", "했다", "한다", "할", "함", "되는", "되면", "됐다", "된다",
    "있는", "있으면", "있고", "있어서", "있었다", "있을", "있음",
    "것", "거", "수", "때", "중", "내", "년", "월", "일", "번", "분",
    "영상", "댓글", "동영상", "유튜브", "채널", "구독", "좋아요", "시청",
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
    "to", "of", "in", "for", "on", "with", "at", "by", "from", "as",
    "i", "me", "my", "we", "our", "you", "your", "he", "him", "his", "she", "her",
    "it", "its", "they", "them", "their", "this", "that", "these", "those",
    "and", "but", "if", "or", "so", "than", "too", "very", "just",
    "video", "comment", "youtube", "channel", "subscribe", "watch",
];

const POSITIVE_WORDS: &[&str] = &[
    "좋다", "좋아", "좋네", "좋은", "좋았", "좋음", "좋고", "좋죠", "좋아요", "좋습니다",
    "최고", "최고다", "최고야", "최고예요", "최고임", "최고에요",
    "대박", "대박이다", "대박이네",
    "멋지다", "멋져", "멋있다", "멋있어", "멋짐", "멋진",
    "예쁘다", "예뻐", "예쁨", "예쁜", "이쁘다", "이뻐", "이쁨",
    "사랑", "사랑해", "사랑해요", "사랑합니다", "사랑스럽",
    "감사", "감사해요", "감사합니다", "고마워", "고맙습니다",
    "행복", "행복해", "기쁘다", "기뻐", "즐겁다", "즐거워",
    "기대된다", "기대돼", "기대됩니다",
    "응원", "응원해", "응원합니다", "화이팅", "파이팅", "힘내",
    "축하", "축하해", "축하합니다",
    "훌륭", "훌륭해", "완벽", "완벽해",
    "감동", "감동적", "감동받았",
    "재밌", "재밌다", "재밌어", "재미있", "재미있다",
    "웃기다", "웃겨", "웃김",
    "힐링", "귀엽", "귀여워", "귀여운", "깜찍",
    "잘생", "잘생겼", "잘생김", "존잘", "핸섬", "존예",
    "짱", "쩔어", "쩐다", "미쳤다", "미쳤어",
    "대단", "대단해", "대단하다", "놀랍", "놀라워", "신기",
    "레전드", "인정", "추천", "추천합니다",
    "갓", "갓벽", "존경", "리스펙", "간지", "천재",
    "아름답", "아름다워", "아름다운", "황홀", "환상적",
    "역시", "믿고보는", "찐", "꿀잼", "핵잼", "존잼", "개이득",
    "소름", "소름돋", "전율", "감탄", "울컥", "공감",
    "good", "great", "best", "love", "like", "amazing", "awesome", "wonderful",
    "beautiful", "excellent", "fantastic", "nice", "perfect", "happy", "cool",
    "incredible", "brilliant", "outstanding", "superb", "lovely",
    "talented", "genius", "wow", "omg", "fire", "legend", "goat",
    "queen", "king", "iconic", "slay", "proud", "blessed", "grateful",
    "support", "favorite", "respect",
];

const NEGATIVE_WORDS: &[&str] = &[
    "싫다", "싫어", "싫음", "싫네",
    "별로", "별로다", "별루",
    "최악", "최악이다",
    "실망", "실망이다", "실망했", "실망스럽",
    "짜증", "짜증나", "짜증난다",
    "화나", "화난다", "화남", "분노", "열받",
    "답답", "답답하다", "답답해",
    "불쾌", "불쾌하다",
    "슬프", "슬퍼", "슬픔", "우울",
    "안타깝", "아쉽", "아쉽다", "아쉬워",
    "걱정", "걱정된다", "불안",
    "힘들", "힘들다", "피곤",
    "나쁘", "나빠", "나쁜",
    "후회", "후회된다",
    "혐오", "역겹", "역겨워",
    "지루", "지루하다", "노잼", "재미없",
    "망했", "망함", "망작", "폭망",
    "쓰레기", "불편", "불편하다",
    "비추", "비추천",
    "bad", "worst", "hate", "dislike", "terrible", "awful", "horrible",
    "sad", "angry", "disappointed", "disappointing", "boring", "annoying",
    "frustrated", "worried", "fail", "failed", "failure", "wrong",
    "disgusting", "pathetic", "waste", "garbage", "trash", "cringe",
    "overrated", "underwhelming", "meh",
];

const POSITIVE_EMOJI: &[&str] = &[
    "😀", "😃", "😄", "😁", "😆", "😅", "🤣", "😂", "🙂", "😊", "😇",
    "🥰", "😍", "🤩", "😘", "😗", "😚", "😙", "🥲",
    "👍", "👏", "🙌", "💪", "✨", "🌟", "⭐", "💖", "💗", "💓", "💕",
    "❤️", "🧡", "💛", "💚", "💙", "💜", "🖤", "🤍", "💝", "💘", "♥️", "❤",
    "🔥", "💯", "🎉", "🎊", "👑", "💎", "🏆", "🥇",
    "😎", "🤗", "🥳", "😋", "😜", "😝", "🤭", "🫶", "🫰",
];

const NEGATIVE_EMOJI: &[&str] = &[
    "😢", "😭", "😤", "😠", "😡", "🤬", "😈", "👿",
    "💔", "👎", "🙄", "😒", "😞", "😔", "😟", "😕", "🙁", "☹️",
    "😣", "😖", "😫", "😩", "🥺", "😰", "😨", "😱", "🤮", "🤢",
];

fn default_taxonomy() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "model_appearance",
            "모델/비주얼",
            &[
                "예쁘", "이쁘", "잘생", "비주얼", "얼굴", "외모", "미모", "몸매", "눈빛", "헤어",
                "메이크업", "화보", "존예", "존잘", "pretty", "handsome", "gorgeous", "visual",
            ],
        ),
        KeywordGroup::new(
            "product_service",
            "제품/서비스",
            &[
                "가격", "제품", "구매", "품질", "디자인", "색상", "사이즈", "배송", "매장", "할인",
                "쿠폰", "성능", "기능", "가성비", "price", "product", "quality",
            ],
        ),
        KeywordGroup::new(
            "content_creative",
            "콘텐츠/연출",
            &[
                "영상미", "연출", "편집", "음악", "노래", "브금", "bgm", "촬영", "색감", "퀄리티",
                "광고", "스토리", "컨셉", "감독", "뮤비",
            ],
        ),
        KeywordGroup::new(
            "brand_image",
            "브랜드 이미지",
            &[
                "브랜드", "이미지", "고급", "신뢰", "세련", "트렌디", "감성", "어울", "찰떡",
                "럭셔리", "brand", "luxury",
            ],
        ),
        KeywordGroup::new(
            "fandom_support",
            "팬덤/응원",
            &[
                "응원", "사랑해", "팬이", "팬으로", "덕질", "최애", "입덕", "화이팅", "파이팅",
                "오빠", "언니", "스밍", "stan",
            ],
        ),
        KeywordGroup::new(
            "general_reaction",
            "일반 반응",
            &["대박", "최고", "헐", "ㅋㅋ", "ㅎㅎ", "wow", "lol"],
        ),
    ]
}

fn default_journey_stages() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "awareness",
            "인지",
            &[
                "처음 알", "처음 봤", "처음 보", "알게 됐", "알게 되", "뭐지", "누구야", "누구예요",
                "광고 보고", "광고로 봤",
            ],
        ),
        KeywordGroup::new(
            "interest",
            "관심",
            &[
                "궁금", "관심", "알아보", "정보", "어디서 사", "어디서 팔", "제품명", "이름이 뭐",
                "뭐예요",
            ],
        ),
        KeywordGroup::new(
            "consideration",
            "고려",
            &[
                "고민", "비교", "살까", "사볼까", "얼마", "후기", "리뷰", "써볼까", "괜찮나",
                "가성비",
            ],
        ),
        KeywordGroup::new(
            "purchase",
            "구매",
            &[
                "샀", "구매했", "주문", "결제", "질렀", "장바구니", "품절", "득템", "배송 왔",
            ],
        ),
        KeywordGroup::new(
            "advocacy",
            "추천/충성",
            &["추천", "재구매", "또 살", "계속 쓰", "인생템", "애용", "강추", "정착"],
        ),
    ]
}

fn default_journey_guidance() -> Vec<JourneyGuidance> {
    vec![
        JourneyGuidance {
            stage: "awareness".to_string(),
            min_percentage: 30.0,
            title: "처음 접한 시청자 비중이 높음".to_string(),
            body: "댓글의 {pct}%가 이 콘텐츠로 처음 알게 되었다는 반응입니다. 인지 단계 유입은 충분하지만 다음 단계로 이어질 정보가 부족할 수 있습니다.".to_string(),
            action: "제품명, 구매처 등 핵심 정보를 고정 댓글과 설명란에 명확히 노출".to_string(),
        },
        JourneyGuidance {
            stage: "consideration".to_string(),
            min_percentage: 20.0,
            title: "구매를 고민하는 층이 뚜렷함".to_string(),
            body: "댓글의 {pct}%가 가격, 후기, 비교를 언급하며 구매를 저울질하고 있습니다.".to_string(),
            action: "실사용 후기, 비교 콘텐츠, 한정 혜택으로 전환 장벽을 낮출 것".to_string(),
        },
        JourneyGuidance {
            stage: "purchase".to_string(),
            min_percentage: 10.0,
            title: "실제 구매 인증이 나타남".to_string(),
            body: "댓글의 {pct}%가 구매 또는 주문 경험을 언급합니다.".to_string(),
            action: "구매 인증 댓글을 리뷰 콘텐츠로 재활용하고 재구매 동선을 설계".to_string(),
        },
        JourneyGuidance {
            stage: "advocacy".to_string(),
            min_percentage: 10.0,
            title: "자발적 추천 단계의 팬 존재".to_string(),
            body: "댓글의 {pct}%가 추천이나 재구매 의사를 드러냅니다.".to_string(),
            action: "추천 고객 대상 리퍼럴 프로그램 운영".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sentiment.positive, 0.15);
        assert_eq!(config.sentiment.negative, -0.2);
        assert_eq!(config.opinion_fallback.as_deref(), Some("general_reaction"));
        assert!(config.category_name("product_service").is_some());
        assert_eq!(config.stage_name("purchase"), Some("구매"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalyzerConfig::from_json_str(
            r#"{"min_language_support": 2, "sentiment": {"positive": 0.1, "negative": -0.1}}"#,
        )
        .unwrap();
        assert_eq!(config.min_language_support, 2);
        assert_eq!(config.sentiment.positive, 0.1);
        assert_eq!(config.sentiment.negative, -0.1);
        assert_eq!(config.sentiment.emoji_weight, 1.5);
        assert_eq!(config.opinion_taxonomy, default_taxonomy());
    }

    #[test]
    fn test_rejects_unknown_fallback() {
        let err = AnalyzerConfig::from_json_str(r#"{"opinion_fallback": "nope"}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::UnknownFallback(ref id) if id == "nope"));
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let config = AnalyzerConfig::from_json_str(r#"{"opinion_fallback": null}"#).unwrap();
        assert!(config.opinion_fallback.is_none());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = AnalyzerConfig::from_json_str(
            r#"{"sentiment": {"positive": -0.5, "negative": 0.5}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidThreshold(_)));
    }

    #[test]
    fn test_rejects_bad_punctuation_pattern() {
        let err = AnalyzerConfig::from_json_str(r#"{"negative_punctuation": "(("}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidPattern { .. }));
    }

    #[test]
    fn test_rejects_empty_stage_table() {
        let err = AnalyzerConfig::from_json_str(r#"{"journey_stages": []}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptyStageTable));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AnalyzerConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
