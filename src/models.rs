//! Data model shared by every stage of the comment analytics pipeline.
//!
//! - Input records (`Comment`, `CommentBatch`) as handed over by the comment source
//! - Per-comment signals (sentiment, language, opinion tags, journey stage)
//! - Batch level aggregates, keywords, insight statements and the final `Report`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Input
// ============================================================================

/// A single comment attached to a media item. Read-only for every classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Anything that is not a JSON string (null, number, object) becomes empty text.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
    /// Null, negative, fractional or non-numeric counts become 0.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub author: String,
}

impl Comment {
    pub fn new(id: impl Into<String>, text: impl Into<String>, like_count: u64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            like_count,
            author: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().unwrap_or(0))
}

/// An already materialized list of comments plus the upstream framing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CommentBatch {
    /// Opaque reference of the media item, echoed back in the report.
    #[serde(default)]
    pub item_id: Option<String>,
    /// Total number of comments available upstream (the batch may be a capped sample).
    #[serde(default)]
    pub total_available: Option<u64>,
    /// Overrides the configured keyword count for this batch.
    #[serde(default)]
    pub top_keywords: Option<usize>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl CommentBatch {
    pub fn from_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            ..Default::default()
        }
    }
}

// ============================================================================
// Per-comment signals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
        }
    }
}

/// Coarse language label. `Other` is a language the detector recognised outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Korean,
    English,
    Japanese,
    Chinese,
    Spanish,
    Portuguese,
    French,
    German,
    Russian,
    Vietnamese,
    Thai,
    Indonesian,
    Other,
    Unknown,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "korean",
            Language::English => "english",
            Language::Japanese => "japanese",
            Language::Chinese => "chinese",
            Language::Spanish => "spanish",
            Language::Portuguese => "portuguese",
            Language::French => "french",
            Language::German => "german",
            Language::Russian => "russian",
            Language::Vietnamese => "vietnamese",
            Language::Thai => "thai",
            Language::Indonesian => "indonesian",
            Language::Other => "other",
            Language::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Korean => "한국어",
            Language::English => "영어",
            Language::Japanese => "일본어",
            Language::Chinese => "중국어",
            Language::Spanish => "스페인어",
            Language::Portuguese => "포르투갈어",
            Language::French => "프랑스어",
            Language::German => "독일어",
            Language::Russian => "러시아어",
            Language::Vietnamese => "베트남어",
            Language::Thai => "태국어",
            Language::Indonesian => "인도네시아어",
            Language::Other => "기타",
            Language::Unknown => "알 수 없음",
        }
    }
}

/// Multi-label opinion categories in taxonomy order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpinionTags(Vec<String>);

impl OpinionTags {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(id: impl Into<String>) -> Self {
        Self(vec![id.into()])
    }

    pub fn insert(&mut self, id: &str) {
        if !self.contains(id) {
            self.0.push(id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|c| c == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Single funnel stage, or `Unknown` when no stage keyword matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JourneyStage {
    Stage(String),
    Unknown,
}

impl JourneyStage {
    pub const UNKNOWN_ID: &'static str = "unknown";

    pub fn as_str(&self) -> &str {
        match self {
            JourneyStage::Stage(id) => id,
            JourneyStage::Unknown => Self::UNKNOWN_ID,
        }
    }
}

impl Serialize for JourneyStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Everything the per-comment classifiers produce for one comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentSignals {
    pub sentiment: SentimentResult,
    pub language: Language,
    pub opinions: OpinionTags,
    pub journey: JourneyStage,
}

impl CommentSignals {
    /// Defaults used when classifying a comment failed.
    pub fn degraded(fallback_category: Option<&str>) -> Self {
        Self {
            sentiment: SentimentResult::neutral(),
            language: Language::Unknown,
            opinions: fallback_category.map(OpinionTags::single).unwrap_or_default(),
            journey: JourneyStage::Unknown,
        }
    }
}

// ============================================================================
// Batch level results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeywordEntry {
    pub term: String,
    /// Raw number of occurrences across the batch.
    pub count: usize,
    /// Ranking weight: equal to `count` in frequency mode, mean TF-IDF in weighted mode.
    pub weight: f64,
}

/// A comment as shown in a report (representative example or highlight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExampleComment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub like_count: u64,
}

impl ExampleComment {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            author: comment.author.clone(),
            text: comment.text.clone(),
            like_count: comment.like_count,
        }
    }

    /// Same as `from_comment`, with the text cut to `max_chars` characters plus `...`.
    pub fn truncated(comment: &Comment, max_chars: usize) -> Self {
        let mut example = Self::from_comment(comment);
        if comment.text.chars().count() > max_chars {
            example.text = comment.text.chars().take(max_chars).collect::<String>() + "...";
        }
        example
    }
}

/// Per-group breakdown shared by the language, opinion and journey dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroupAggregate {
    /// Machine key (language code, category id, stage id).
    pub key: String,
    /// Display name from the configuration tables.
    pub label: String,
    pub count: usize,
    /// Share of the whole analyzed batch.
    pub percentage: f64,
    /// Share of positive comments inside the group.
    pub positive_pct: f64,
    /// Share of negative comments inside the group.
    pub negative_pct: f64,
    /// Most liked member of the group (ties: first encountered).
    pub representative_example: Option<ExampleComment>,
}

pub type LanguageAggregate = GroupAggregate;
pub type CategoryAggregate = GroupAggregate;
pub type JourneyAggregate = GroupAggregate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentOverview {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    /// Share of positive comments among the most liked comments.
    pub top_liked_positive_ratio: f64,
}

/// Expectation / anxiety keyword tallies. One comment may count toward both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConcernTallies {
    pub expectation: usize,
    pub anxiety: usize,
    pub expectation_pct: f64,
    pub anxiety_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Highlights {
    pub positive: Vec<ExampleComment>,
    pub negative: Vec<ExampleComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsightStatement {
    /// Identifier of the rule that produced the statement.
    pub id: String,
    pub title: String,
    pub body: String,
    pub recommended_action: String,
}

/// Final payload handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub item_id: Option<String>,
    pub analyzed_comments: usize,
    pub total_available: Option<u64>,
    pub sentiment: SentimentOverview,
    pub keywords: Vec<KeywordEntry>,
    pub languages: Vec<GroupAggregate>,
    pub opinions: Vec<GroupAggregate>,
    pub journey: Vec<GroupAggregate>,
    pub concerns: ConcernTallies,
    pub highlights: Highlights,
    pub insights: Vec<InsightStatement>,
    pub action_items: Vec<String>,
}
