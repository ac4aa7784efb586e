use crate::config::{EmbeddingProvider, Settings};
use crate::embedding_service::{Embedder, HashingEmbedder, OpenAiEmbedder};
use crate::error::RagResult;
use crate::index_provisioner::IndexProvisioner;
use crate::openai_service::{build_http_client, OpenAiChat};
use crate::query_service::QueryService;
use crate::retriever::IndexRetriever;
use crate::vector_index::VectorIndex;
use reqwest::Client;
use std::sync::Arc;

/// Everything the server needs, wired once at startup.
pub struct RagLibrary {
    pub query_service: Arc<QueryService>,
    pub index: Arc<VectorIndex>,
}

impl RagLibrary {
    pub async fn new(settings: &Settings) -> RagResult<Self> {
        log::info!("Initializing RAG Library...");

        let client = build_http_client(settings.request_timeout)?;
        let embedder = embedder_for(settings, client.clone());
        let index = Arc::new(provision_index(settings, embedder.as_ref()).await?);

        let retriever = Arc::new(IndexRetriever::new(
            index.clone(),
            embedder,
            settings.score_threshold,
            settings.top_k,
        ));
        let chat = Arc::new(OpenAiChat::new(
            client,
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
            settings.chat_model.clone(),
        ));
        let query_service = Arc::new(QueryService::new(retriever, chat));

        log::info!("RAG Library initialized with {} records", index.len());
        Ok(Self { query_service, index })
    }
}

pub fn embedder_for(settings: &Settings, client: Client) -> Arc<dyn Embedder> {
    match &settings.embedding {
        EmbeddingProvider::OpenAi { model } => Arc::new(OpenAiEmbedder::new(
            client,
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
            model.clone(),
        )),
        EmbeddingProvider::Local { dimensions } => Arc::new(HashingEmbedder::new(*dimensions)),
    }
}

pub async fn provision_index(settings: &Settings, embedder: &dyn Embedder) -> RagResult<VectorIndex> {
    IndexProvisioner::new(&settings.index_path, &settings.dataset_path)
        .provision(embedder)
        .await
}
