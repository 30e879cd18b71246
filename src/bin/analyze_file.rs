//! Offline analysis of a comment dump.
//!
//! The input is either a full batch object (`{"item_id": ..., "comments": [...]}`)
//! or a bare array of comments. The report is printed as pretty JSON on stdout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use comment_lens::{Analyzer, AnalyzerConfig, Comment, CommentBatch};

#[derive(Parser)]
#[command(name = "analyze_file")]
#[command(about = "Analyze a JSON comment dump and print the report")]
#[command(version)]
struct Args {
    /// Comment batch or comment array (JSON)
    input: PathBuf,

    /// Analyzer config override (JSON); defaults to COMMENT_LENS_CONFIG or built-ins
    config: Option<PathBuf>,

    /// Number of keywords to report (overrides the batch / config value)
    #[arg(short = 'k', long)]
    top_keywords: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Comments(Vec<Comment>),
    Batch(CommentBatch),
}

fn main() -> Result<()> {
    let args = Args::parse();

    // logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let mut batch = match serde_json::from_str::<Input>(&raw).context("input is not a batch or comment array")? {
        Input::Batch(batch) => batch,
        Input::Comments(comments) => CommentBatch::from_comments(comments),
    };
    if args.top_keywords.is_some() {
        batch.top_keywords = args.top_keywords;
    }

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)?,
        None => AnalyzerConfig::from_env()?,
    };
    let analyzer = Analyzer::new(config)?;

    let report = analyzer.analyze_batch(&batch);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
