//! Embedding provider trait and provider selection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EmbeddingProviderKind, Settings};
use crate::error::{RagError, Result};
use crate::ollama::OllamaEmbedder;
use crate::openai::OpenAiEmbedder;

/// A provider that generates vector embeddings from text input.
///
/// The two backends (remote OpenAI API, local Ollama server) are
/// interchangeable from the pipeline's point of view; they differ only
/// in latency, cost, and output dimensionality. The default
/// [`embed_batch`](Embedder::embed_batch) implementation calls
/// [`embed`](Embedder::embed) sequentially; backends with native
/// batching should override it.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Construct the embedder selected by the deployment settings.
///
/// Exactly one provider is active per deployment; the indexer and the
/// query server must be given the same settings so that index-time and
/// query-time dimensions agree.
///
/// # Errors
///
/// Returns [`RagError::InvalidConfiguration`] if the selected provider
/// is missing its credentials.
pub fn embedder_from_settings(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    match settings.embedding_provider {
        EmbeddingProviderKind::OpenAi => {
            let api_key = settings.openai_api_key.as_deref().ok_or_else(|| {
                RagError::InvalidConfiguration(
                    "OPENAI_API_KEY is required for the openai embedding provider".to_string(),
                )
            })?;
            Ok(Arc::new(OpenAiEmbedder::new(api_key)?))
        }
        EmbeddingProviderKind::Ollama => Ok(Arc::new(OllamaEmbedder::new(
            &settings.ollama_url,
            &settings.ollama_embed_model,
            settings.ollama_embed_dimensions,
        )?)),
    }
}
