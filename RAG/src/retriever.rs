use crate::embedding_service::Embedder;
use crate::error::RagResult;
use crate::models::ScoredRecord;
use crate::vector_index::VectorIndex;
use async_trait::async_trait;
use std::sync::Arc;

/// Finds the stored records most similar to a question, closest first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, question: &str) -> RagResult<Vec<ScoredRecord>>;
}

pub struct IndexRetriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    score_threshold: f32,
    top_k: usize,
}

impl IndexRetriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>, score_threshold: f32, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            score_threshold,
            top_k,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[async_trait]
impl Retriever for IndexRetriever {
    async fn retrieve(&self, question: &str) -> RagResult<Vec<ScoredRecord>> {
        let query_embedding = self.embedder.embed(question).await?;
        let matches = self.index.search(&query_embedding, self.score_threshold, self.top_k)?;
        log::info!("Found {} records above threshold {}", matches.len(), self.score_threshold);
        Ok(matches)
    }
}
