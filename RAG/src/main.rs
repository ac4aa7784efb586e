// Builds (or loads) the vector index ahead of time so the API server starts fast.

use anyhow::{Context, Result};
use faq_rag::library::{embedder_for, provision_index};
use faq_rag::openai_service::build_http_client;
use faq_rag::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env().context("failed to read settings")?;
    let client = build_http_client(settings.request_timeout)?;
    let embedder = embedder_for(&settings, client);

    let index = provision_index(&settings, embedder.as_ref())
        .await
        .with_context(|| format!("failed to provision index at {}", settings.index_path.display()))?;

    log::info!(
        "Index ready: {} records, {} dimensions, embedder {}",
        index.len(),
        index.dim(),
        index.embedder()
    );
    Ok(())
}
