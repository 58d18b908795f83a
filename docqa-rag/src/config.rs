//! Configuration for the retrieval pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tuning parameters for chunking, retrieval, and batched indexing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results to return from vector search.
    pub top_k: usize,
    /// Maximum number of records per upsert batch.
    pub batch_size: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 700, chunk_overlap: 100, top_k: 5, batch_size: 50 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to return from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum number of records per upsert batch.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if:
    /// - `chunk_overlap == 0` or `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `batch_size == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_overlap == 0 || self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be greater than zero and less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::InvalidConfiguration(
                "top_k must be greater than zero".to_string(),
            ));
        }
        if self.config.batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

/// Which embedding backend a deployment uses.
///
/// The same provider must be used at index-build time and at query
/// time, otherwise the collection's dimensionality will not match the
/// query vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    /// Remote OpenAI embeddings API.
    OpenAi,
    /// Local Ollama embeddings endpoint.
    Ollama,
}

/// Deployment settings shared by the indexer and the query server,
/// loaded from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Qdrant endpoint URL (gRPC port).
    pub qdrant_url: String,
    /// Qdrant API key; `None` for unauthenticated local instances.
    pub qdrant_api_key: Option<String>,
    /// Name of the vector collection.
    pub collection_name: String,
    /// Which embedding backend to construct.
    pub embedding_provider: EmbeddingProviderKind,
    /// OpenAI API key, required when the OpenAI provider is selected
    /// or when answers are generated.
    pub openai_api_key: Option<String>,
    /// Base URL of the local Ollama server.
    pub ollama_url: String,
    /// Ollama embedding model name.
    pub ollama_embed_model: String,
    /// Dimensionality of the Ollama embedding model's output.
    pub ollama_embed_dimensions: usize,
    /// Chunking/retrieval/batching knobs.
    pub rag: RagConfig,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_usize(name: &str, default: usize) -> Result<usize> {
    match env_var(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            RagError::InvalidConfiguration(format!("{name} must be a positive integer, got {raw:?}"))
        }),
    }
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if `QDRANT_URL` is
    /// missing, if `EMBEDDING_PROVIDER` names an unknown backend, if
    /// `OPENAI_API_KEY` is missing while the OpenAI provider is
    /// selected, or if any numeric knob fails to parse or validate.
    pub fn from_env() -> Result<Self> {
        let qdrant_url = env_var("QDRANT_URL").ok_or_else(|| {
            RagError::InvalidConfiguration("QDRANT_URL environment variable not set".to_string())
        })?;

        let embedding_provider = match env_var("EMBEDDING_PROVIDER").as_deref() {
            None | Some("openai") => EmbeddingProviderKind::OpenAi,
            Some("ollama") => EmbeddingProviderKind::Ollama,
            Some(other) => {
                return Err(RagError::InvalidConfiguration(format!(
                    "EMBEDDING_PROVIDER must be \"openai\" or \"ollama\", got {other:?}"
                )));
            }
        };

        let openai_api_key = env_var("OPENAI_API_KEY");
        if embedding_provider == EmbeddingProviderKind::OpenAi && openai_api_key.is_none() {
            return Err(RagError::InvalidConfiguration(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ));
        }

        let rag = RagConfig::builder()
            .chunk_size(env_usize("CHUNK_SIZE", 700)?)
            .chunk_overlap(env_usize("CHUNK_OVERLAP", 100)?)
            .top_k(env_usize("TOP_K", 5)?)
            .batch_size(env_usize("BATCH_SIZE", 50)?)
            .build()?;

        Ok(Self {
            qdrant_url,
            qdrant_api_key: env_var("QDRANT_API_KEY"),
            collection_name: env_var("COLLECTION_NAME")
                .unwrap_or_else(|| "docqa_chunks".to_string()),
            embedding_provider,
            openai_api_key,
            ollama_url: env_var("OLLAMA_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            ollama_embed_model: env_var("OLLAMA_EMBED_MODEL")
                .unwrap_or_else(|| "nomic-embed-text".to_string()),
            ollama_embed_dimensions: env_usize("OLLAMA_EMBED_DIMENSIONS", 768)?,
            rag,
        })
    }
}
