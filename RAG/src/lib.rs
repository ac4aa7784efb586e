pub mod config;
pub mod dataset;
pub mod embedding_service;
pub mod error;
pub mod index_provisioner;
pub mod library;
pub mod models;
pub mod openai_service;
pub mod query_service;
pub mod retriever;
pub mod vector_index;

#[cfg(test)]
mod test_support;

pub use config::{EmbeddingProvider, Settings};
pub use embedding_service::{Embedder, HashingEmbedder, OpenAiEmbedder};
pub use error::{RagError, RagResult};
pub use index_provisioner::IndexProvisioner;
pub use library::RagLibrary;
pub use models::*;
pub use openai_service::{ChatCompletion, OpenAiChat};
pub use query_service::{QueryService, NO_CONTEXT_ANSWER};
pub use retriever::{IndexRetriever, Retriever};
pub use vector_index::VectorIndex;
