//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. It enforces the same dimension rules as the
//! Qdrant backend, which makes it the store of choice for tests and
//! local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{RagError, Result};
use crate::record::{SearchHit, VectorRecord};
use crate::vectorstore::VectorStore;

struct Collection {
    dimensions: usize,
    records: HashMap<u64, VectorRecord>,
}

/// An in-memory [`VectorStore`] with strict dimension checks.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn recreate_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .insert(name.to_string(), Collection { dimensions, records: HashMap::new() });
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[VectorRecord]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let entry = collections.get_mut(collection).ok_or_else(|| RagError::IndexUnavailable {
            message: format!("collection '{collection}' does not exist"),
        })?;
        for record in records {
            if record.vector.len() != entry.dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: entry.dimensions,
                    actual: record.vector.len(),
                });
            }
        }
        for record in records {
            entry.records.insert(record.id, record.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let collections = self.collections.read().await;
        let Some(entry) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        if query.len() != entry.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: entry.dimensions,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = entry
            .records
            .values()
            .map(|record| SearchHit {
                text: record.text.clone(),
                score: cosine_similarity(&record.vector, query),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }
}
