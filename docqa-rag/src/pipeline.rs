//! Retrieval pipeline orchestrator.
//!
//! [`RagPipeline`] composes an [`Embedder`] and a [`VectorStore`] with
//! the chunking policy: indexing runs chunk → embed → batched upsert,
//! querying runs embed → search → context assembly. The pipeline holds
//! no persistent state of its own; the vector index is the sole owner
//! of persisted records and is treated as a remote authority queried
//! per request.

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::RecursiveChunker;
use crate::config::RagConfig;
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::record::{SearchHit, VectorRecord};
use crate::vectorstore::{VectorStore, upsert_batched};

/// Separator between retrieved chunk texts in the assembled context.
const CONTEXT_SEPARATOR: &str = "\n---\n";

/// The retrieval pipeline.
///
/// Construct one via [`RagPipeline::builder()`]. The pipeline is
/// `Send + Sync` and intended to be built once at process start and
/// shared behind an `Arc` across request handlers.
pub struct RagPipeline {
    config: RagConfig,
    chunker: RecursiveChunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    collection: String,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("chunker", &self.chunker)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Destructively (re)create the pipeline's collection with the
    /// embedder's dimensionality and cosine distance.
    pub async fn create_collection(&self) -> Result<()> {
        let dimensions = self.embedder.dimensions();
        self.store.recreate_collection(&self.collection, dimensions).await.inspect_err(|e| {
            error!(collection = %self.collection, error = %e, "failed to create collection");
        })?;
        info!(collection = %self.collection, dimensions, "collection created");
        Ok(())
    }

    /// Index a body of text: chunk, embed, and upsert in batches.
    ///
    /// Record ids are assigned contiguously from 0; this relies on
    /// [`create_collection`](Self::create_collection) having wiped any
    /// previous run. Returns the number of chunks stored — 0 for empty
    /// input, which callers must treat as a failed indexing run.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::Embedding`] from the embedder and
    /// [`RagError::IndexWriteFailed`] (with the committed-record
    /// count) from the batched upsert.
    pub async fn index_text(&self, text: &str) -> Result<usize> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            info!(collection = %self.collection, chunk_count = 0, "nothing to index");
            return Ok(0);
        }
        info!(collection = %self.collection, chunk_count = chunks.len(), "chunked input text");

        // Embed in batch_size slices so a large corpus never rides on a
        // single oversized embedding request.
        let mut records = Vec::with_capacity(chunks.len());
        for (batch_index, batch) in chunks.chunks(self.config.batch_size).enumerate() {
            let texts: Vec<&str> = batch.iter().map(String::as_str).collect();
            let vectors = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
                error!(batch_index, error = %e, "embedding failed during indexing");
            })?;
            for (chunk, vector) in batch.iter().zip(vectors) {
                records.push(VectorRecord {
                    id: records.len() as u64,
                    vector,
                    text: chunk.clone(),
                });
            }
        }

        upsert_batched(self.store.as_ref(), &self.collection, &records, self.config.batch_size)
            .await
            .inspect_err(|e| {
                error!(collection = %self.collection, error = %e, "batched upsert failed");
            })?;

        info!(collection = %self.collection, record_count = records.len(), "indexing complete");
        Ok(records.len())
    }

    /// Embed `question` and return the `top_k` nearest chunks.
    pub async fn search(&self, question: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let query_vector = self.embedder.embed(question).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;

        let hits =
            self.store.search(&self.collection, &query_vector, top_k).await.inspect_err(|e| {
                error!(collection = %self.collection, error = %e, "vector search failed");
            })?;

        info!(collection = %self.collection, hit_count = hits.len(), "query completed");
        Ok(hits)
    }

    /// Retrieve grounding context for `question`.
    ///
    /// Hit texts are joined with `"\n---\n"` in descending-score order.
    /// Zero hits yield an empty string; that is a legitimate outcome,
    /// not an error — the answer generator handles empty context.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<String> {
        let hits = self.search(question, top_k).await?;
        let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        Ok(texts.join(CONTEXT_SEPARATOR))
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required except `config`, which defaults. The
/// chunker is derived from the config, so config validation happens in
/// [`build()`](RagPipelineBuilder::build).
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn Embedder>>,
    store: Option<Arc<dyn VectorStore>>,
    collection: Option<String>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Build the [`RagPipeline`], validating the chunking parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if a required field
    /// is missing or the chunking parameters are inconsistent.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::InvalidConfiguration("embedder is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| RagError::InvalidConfiguration("store is required".to_string()))?;
        let collection = self
            .collection
            .ok_or_else(|| RagError::InvalidConfiguration("collection is required".to_string()))?;
        let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?;

        Ok(RagPipeline { config, chunker, embedder, store, collection })
    }
}
