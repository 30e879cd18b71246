//! HTTP surface for the analyzer.
//!
//! - `POST /analyze`: analyze one comment batch, returns a `Report`
//! - `GET /config`: the active analyzer configuration
//! - `GET /health`: liveness plus build info
//!
//! Analysis is CPU-bound, so it runs on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AnalyzerConfig;
use crate::models::{
    Comment, CommentBatch, ConcernTallies, ExampleComment, GroupAggregate, Highlights,
    InsightStatement, KeywordEntry, Report, SentimentOverview,
};
use crate::pipeline::Analyzer;

const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub language_detector: bool,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(analyze, get_config, health),
    components(
        schemas(
            Comment,
            CommentBatch,
            Report,
            SentimentOverview,
            KeywordEntry,
            GroupAggregate,
            ExampleComment,
            ConcernTallies,
            Highlights,
            InsightStatement,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "analysis", description = "Comment Batch Analysis API"),
        (name = "system", description = "Service Configuration and Health")
    )
)]
pub struct ApiDoc;

pub fn router(analyzer: Arc<Analyzer>) -> Router {
    let state = Arc::new(AppState { analyzer });

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/analyze", post(analyze))
        .route("/config", get(get_config))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = CommentBatch,
    responses(
        (status = 200, description = "Analysis report", body = Report),
        (status = 400, description = "Batch has no comments", body = ErrorResponse),
        (status = 500, description = "Analysis task failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<CommentBatch>,
) -> Result<Json<Report>, ApiError> {
    if batch.comments.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "no comments to analyze"));
    }

    info!(
        "Analyze request - item={}, comments={}",
        batch.item_id.as_deref().unwrap_or("-"),
        batch.comments.len()
    );

    let analyzer = Arc::clone(&state.analyzer);
    let report = tokio::task::spawn_blocking(move || analyzer.analyze_batch(&batch))
        .await
        .map_err(|e| {
            error!("Analysis task failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "analysis failed")
        })?;

    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Active analyzer configuration (lexicons, taxonomy, thresholds)")
    ),
    tag = "system"
)]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<AnalyzerConfig> {
    Json(state.analyzer.config().clone())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        language_detector: state.analyzer.config().language_detector
            && crate::language::detector_available(),
    })
}
