use crate::dataset::load_records;
use crate::embedding_service::Embedder;
use crate::error::RagResult;
use crate::vector_index::VectorIndex;
use std::path::PathBuf;

/// Makes sure a queryable index exists before the service starts answering.
pub struct IndexProvisioner {
    index_path: PathBuf,
    dataset_path: PathBuf,
}

impl IndexProvisioner {
    pub fn new(index_path: impl Into<PathBuf>, dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            dataset_path: dataset_path.into(),
        }
    }

    /// Loads the persisted index if one exists, otherwise builds it from the dataset
    /// and persists it for the next startup.
    pub async fn provision(&self, embedder: &dyn Embedder) -> RagResult<VectorIndex> {
        if self.index_path.exists() {
            log::info!("Loading existing index from {}", self.index_path.display());
            let index = VectorIndex::load(&self.index_path)?;
            if index.embedder() != embedder.id() {
                log::warn!(
                    "Index was built with '{}' but queries will use '{}'",
                    index.embedder(),
                    embedder.id()
                );
            }
            return Ok(index);
        }

        log::info!("No index at {}, building from dataset", self.index_path.display());
        let records = load_records(&self.dataset_path)?;
        let index = VectorIndex::build(records, embedder).await?;
        index.save(&self.index_path)?;
        Ok(index)
    }
}
