//! Vector store trait and the batched-upsert protocol.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{RagError, Result};
use crate::record::{SearchHit, VectorRecord};

/// A persistent store of vector records with similarity search.
///
/// A collection's dimensionality and distance metric (cosine) are
/// fixed at creation and must match every subsequent insert and query.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Destructively (re)create a named collection.
    ///
    /// Any existing data under `name` is destroyed. Fails with
    /// [`RagError::IndexUnavailable`] on connectivity or auth errors.
    async fn recreate_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Write one batch of records transactionally, waiting for the
    /// index to acknowledge before returning.
    ///
    /// Fails with [`RagError::DimensionMismatch`] if a vector's length
    /// does not match the collection.
    async fn upsert(&self, collection: &str, records: &[VectorRecord]) -> Result<()>;

    /// Return up to `top_k` nearest records by cosine similarity,
    /// ordered by descending score.
    ///
    /// An empty or missing collection yields an empty vec; only
    /// connectivity failures surface [`RagError::IndexUnavailable`].
    async fn search(&self, collection: &str, query: &[f32], top_k: usize)
        -> Result<Vec<SearchHit>>;
}

/// Upsert `records` in sequential batches of at most `batch_size`.
///
/// Batching bounds per-request payload size and avoids write timeouts
/// on large corpora. Each batch is acknowledged before the next is
/// submitted, so a committed batch N implies records `[0, N * batch_size)`
/// are durable. On the first failing batch the remaining batches are
/// abandoned and the error reports how many records were committed.
///
/// # Errors
///
/// Returns [`RagError::InvalidConfiguration`] if `batch_size` is zero,
/// or [`RagError::IndexWriteFailed`] carrying the committed count.
pub async fn upsert_batched(
    store: &dyn VectorStore,
    collection: &str,
    records: &[VectorRecord],
    batch_size: usize,
) -> Result<()> {
    if batch_size == 0 {
        return Err(RagError::InvalidConfiguration(
            "batch_size must be greater than zero".to_string(),
        ));
    }

    let total = records.len();
    let mut committed = 0;
    for batch in records.chunks(batch_size) {
        store.upsert(collection, batch).await.map_err(|e| RagError::IndexWriteFailed {
            committed,
            message: e.to_string(),
        })?;
        committed += batch.len();
        debug!(collection, committed, total, "committed upsert batch");
    }
    Ok(())
}
