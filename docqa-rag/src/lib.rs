//! # docqa-rag
//!
//! Core retrieval pipeline for the DocQA question-answering backend:
//! recursive chunking with exact overlap, interchangeable embedding
//! providers (OpenAI or local Ollama), a [`VectorStore`] trait with
//! Qdrant and in-memory backends, the batched-upsert protocol, and an
//! answer-generation adapter with text and multimodal modes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{InMemoryVectorStore, OpenAiEmbedder, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(OpenAiEmbedder::new(api_key)?))
//!     .store(Arc::new(InMemoryVectorStore::new()))
//!     .collection("docqa_chunks")
//!     .build()?;
//!
//! pipeline.create_collection().await?;
//! pipeline.index_text(&corpus).await?;
//! let context = pipeline.retrieve("what does chapter 3 cover?", 5).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod ollama;
pub mod openai;
pub mod pipeline;
pub mod qdrant;
pub mod record;
pub mod vectorstore;

pub use chunking::RecursiveChunker;
pub use config::{EmbeddingProviderKind, RagConfig, Settings};
pub use embedding::{Embedder, embedder_from_settings};
pub use error::{RagError, Result};
pub use generation::{AnswerGenerator, OpenAiGenerator};
pub use inmemory::InMemoryVectorStore;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use qdrant::QdrantVectorStore;
pub use record::{SearchHit, VectorRecord};
pub use vectorstore::{VectorStore, upsert_batched};
