use thiserror::Error;

pub type RagResult<T> = std::result::Result<T, RagError>;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("Missing question")]
    MissingQuestion,

    #[error("failed to load dataset {path}: {reason}")]
    DatasetLoad { path: String, reason: String },

    #[error("embedding service error: {0}")]
    EmbeddingService(String),

    #[error("index persistence error: {0}")]
    IndexPersistence(String),

    #[error("query embedding has {actual} dimensions but the index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("chat completion error: {0}")]
    Completion(String),

    #[error("chat completion returned no choices")]
    NoCompletion,

    #[error("configuration error: {0}")]
    Config(String),
}

impl RagError {
    /// True for faults caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RagError::MissingQuestion)
    }
}
