//! Rule-based analytics for social media comment batches.
//!
//! A batch of comments is scored for sentiment, tagged with a language, opinion
//! categories and a purchase-journey stage, reduced into per-dimension aggregates
//! and summarized as templated insight statements. All lexicons, taxonomies and
//! thresholds come from `AnalyzerConfig`.

pub mod aggregate;
pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod insights;
pub mod keywords;
pub mod language;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod sentiment;

pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use models::{Comment, CommentBatch, Report};
pub use pipeline::Analyzer;
