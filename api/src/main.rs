mod answer_payload;
mod rag_response;
mod routes;

use anyhow::{Context, Result};
use faq_rag::{RagLibrary, Settings};
use routes::{router, AppState};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env().context("failed to read settings")?;

    // The index must be ready before the first request is accepted.
    let library = RagLibrary::new(&settings)
        .await
        .context("failed to initialize RAG system")?;

    let state = AppState {
        record_count: library.index.len(),
        query_service: library.query_service,
    };
    let app = router(state);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5005".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
