use crate::embedding_service::{cosine_similarity, Embedder};
use crate::error::{RagError, RagResult};
use crate::models::{Record, ScoredRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const INDEX_FORMAT_VERSION: u32 = 1;
const MANIFEST_FILE: &str = "manifest.json";
const VECTORS_FILE: &str = "vectors.f32";

#[derive(Serialize, Deserialize)]
struct Manifest {
    version: u32,
    embedder: String,
    dim: usize,
    records: Vec<Record>,
}

/// Exhaustive cosine-similarity index over dataset records.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    embedder: String,
    dim: usize,
    records: Vec<Record>,
    vectors: Vec<f32>,
}

impl VectorIndex {
    pub fn empty(embedder: impl Into<String>, dim: usize) -> Self {
        Self {
            embedder: embedder.into(),
            dim,
            records: Vec::new(),
            vectors: Vec::new(),
        }
    }

    /// Embeds every record's question and collects the vectors.
    pub async fn build(records: Vec<Record>, embedder: &dyn Embedder) -> RagResult<Self> {
        log::info!("Generating embeddings for {} records...", records.len());

        let questions: Vec<String> = records.iter().map(|r| r.question.clone()).collect();
        let embeddings = embedder.embed_batch(&questions).await?;

        if embeddings.len() != records.len() {
            return Err(RagError::EmbeddingService(format!(
                "expected {} embeddings, received {}",
                records.len(),
                embeddings.len()
            )));
        }

        let dim = embeddings.first().map(|e| e.len()).unwrap_or(0);
        let mut vectors = Vec::with_capacity(dim * records.len());
        for (record, embedding) in records.iter().zip(&embeddings) {
            if embedding.len() != dim {
                return Err(RagError::EmbeddingService(format!(
                    "record {} embedded to {} dimensions, expected {}",
                    record.row,
                    embedding.len(),
                    dim
                )));
            }
            vectors.extend_from_slice(embedding);
        }

        Ok(Self {
            embedder: embedder.id(),
            dim,
            records,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embedder(&self) -> &str {
        &self.embedder
    }

    /// Records scoring at least `threshold`, best first, at most `limit` of them.
    pub fn search(&self, query: &[f32], threshold: f32, limit: usize) -> RagResult<Vec<ScoredRecord>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        if self.dim == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .par_chunks(self.dim)
            .enumerate()
            .map(|(idx, vector)| (idx, cosine_similarity(query, vector)))
            .filter(|(_, score)| *score >= threshold)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(idx, score)| ScoredRecord {
                record: self.records[idx].clone(),
                score,
            })
            .collect())
    }

    pub fn save(&self, dir: &Path) -> RagResult<()> {
        let persist_error = |e: String| RagError::IndexPersistence(format!("{}: {}", dir.display(), e));

        fs::create_dir_all(dir).map_err(|e| persist_error(e.to_string()))?;

        let manifest = Manifest {
            version: INDEX_FORMAT_VERSION,
            embedder: self.embedder.clone(),
            dim: self.dim,
            records: self.records.clone(),
        };
        let manifest_bytes = serde_json::to_vec_pretty(&manifest).map_err(|e| persist_error(e.to_string()))?;
        fs::write(dir.join(MANIFEST_FILE), manifest_bytes).map_err(|e| persist_error(e.to_string()))?;

        let mut buf: Vec<u8> = Vec::with_capacity(self.vectors.len() * 4);
        for value in &self.vectors {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        fs::write(dir.join(VECTORS_FILE), buf).map_err(|e| persist_error(e.to_string()))?;

        log::info!("Saved index with {} records to {}", self.len(), dir.display());
        Ok(())
    }

    /// Loads a saved index. Contents are trusted; only the layout is checked.
    pub fn load(dir: &Path) -> RagResult<Self> {
        let persist_error = |e: String| RagError::IndexPersistence(format!("{}: {}", dir.display(), e));

        let manifest_bytes = fs::read(dir.join(MANIFEST_FILE)).map_err(|e| persist_error(e.to_string()))?;
        let manifest: Manifest = serde_json::from_slice(&manifest_bytes).map_err(|e| persist_error(e.to_string()))?;
        if manifest.version != INDEX_FORMAT_VERSION {
            return Err(persist_error(format!("unsupported index version {}", manifest.version)));
        }

        let vector_bytes = fs::read(dir.join(VECTORS_FILE)).map_err(|e| persist_error(e.to_string()))?;
        let expected_len = manifest.records.len() * manifest.dim * 4;
        if vector_bytes.len() != expected_len {
            return Err(persist_error(format!(
                "vector file holds {} bytes, expected {}",
                vector_bytes.len(),
                expected_len
            )));
        }

        let vectors = vector_bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(Self {
            embedder: manifest.embedder,
            dim: manifest.dim,
            records: manifest.records,
            vectors,
        })
    }
}
