use crate::error::{RagError, RagResult};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_INDEX_PATH: &str = "vector_index";
pub const DEFAULT_DATASET_PATH: &str = "Dataset/dataset.csv";
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingProvider {
    OpenAi { model: String },
    Local { dimensions: usize },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embedding: EmbeddingProvider,
    pub index_path: PathBuf,
    pub dataset_path: PathBuf,
    pub score_threshold: f32,
    pub top_k: usize,
    pub request_timeout: Duration,
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenv::dotenv()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> RagResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> RagResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RagError::Config("OPENAI_API_KEY environment variable not set".to_string()))?;

        let embedding = match lookup("EMBEDDING_PROVIDER")
            .unwrap_or_else(|| "openai".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => EmbeddingProvider::OpenAi {
                model: lookup("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            },
            "local" => EmbeddingProvider::Local {
                dimensions: parse_or(&lookup, "EMBEDDING_DIMENSIONS", 384)?,
            },
            other => {
                return Err(RagError::Config(format!(
                    "EMBEDDING_PROVIDER must be 'openai' or 'local', got '{}'",
                    other
                )))
            }
        };

        let score_threshold: f32 = parse_or(&lookup, "SCORE_THRESHOLD", DEFAULT_SCORE_THRESHOLD)?;
        if !(-1.0..=1.0).contains(&score_threshold) {
            return Err(RagError::Config(format!(
                "SCORE_THRESHOLD must be within [-1, 1], got {}",
                score_threshold
            )));
        }

        let top_k: usize = parse_or(&lookup, "RETRIEVER_TOP_K", 4)?;
        if top_k == 0 {
            return Err(RagError::Config("RETRIEVER_TOP_K must be at least 1".to_string()));
        }

        Ok(Self {
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            chat_model: lookup("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding,
            index_path: PathBuf::from(lookup("INDEX_PATH").unwrap_or_else(|| DEFAULT_INDEX_PATH.to_string())),
            dataset_path: PathBuf::from(lookup("DATASET_PATH").unwrap_or_else(|| DEFAULT_DATASET_PATH.to_string())),
            score_threshold,
            top_k,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> RagResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| RagError::Config(format!("invalid {} '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}
