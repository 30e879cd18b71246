use std::env;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use comment_lens::{api, Analyzer, AnalyzerConfig};

const ADDR_ENV: &str = "COMMENT_LENS_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AnalyzerConfig::from_env().context("failed to load analyzer config")?;
    let analyzer = Arc::new(Analyzer::new(config).context("invalid analyzer config")?);

    let app = api::router(analyzer);

    let addr = env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", listener.local_addr()?);
    info!("Swagger UI at /swagger-ui");
    axum::serve(listener, app).await?;

    Ok(())
}
