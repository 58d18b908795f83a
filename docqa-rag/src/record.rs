//! Data types stored in and returned from the vector index.

use serde::{Deserialize, Serialize};

/// A vector record persisted in the index.
///
/// Ids are assigned as a contiguous `0..n` range per indexing run. This
/// is safe only because indexing always recreates the collection from
/// scratch; there is no incremental reindexing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Monotonically assigned record id.
    pub id: u64,
    /// The embedding vector. Its length must match the collection's
    /// configured dimensionality.
    pub vector: Vec<f32>,
    /// The chunk text carried as payload.
    pub text: String,
}

/// A retrieved chunk paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The stored chunk text.
    pub text: String,
    /// Cosine similarity to the query vector (higher is more relevant).
    pub score: f32,
}
