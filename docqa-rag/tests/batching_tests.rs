//! Tests for the batched-upsert protocol: batch partitioning and
//! partial-failure reporting.

use std::sync::Mutex;

use async_trait::async_trait;
use docqa_rag::record::{SearchHit, VectorRecord};
use docqa_rag::{RagError, VectorStore, upsert_batched};

/// Records the size of every submitted batch and fails on command.
#[derive(Default)]
struct CountingStore {
    batch_sizes: Mutex<Vec<usize>>,
    /// Fail the nth upsert call (0-based), if set.
    fail_at: Option<usize>,
}

impl CountingStore {
    fn failing_at(batch: usize) -> Self {
        Self { batch_sizes: Mutex::new(Vec::new()), fail_at: Some(batch) }
    }
}

#[async_trait]
impl VectorStore for CountingStore {
    async fn recreate_collection(&self, _name: &str, _dimensions: usize) -> docqa_rag::Result<()> {
        Ok(())
    }

    async fn upsert(&self, _collection: &str, records: &[VectorRecord]) -> docqa_rag::Result<()> {
        let mut sizes = self.batch_sizes.lock().unwrap();
        if self.fail_at == Some(sizes.len()) {
            return Err(RagError::IndexUnavailable { message: "connection reset".to_string() });
        }
        sizes.push(records.len());
        Ok(())
    }

    async fn search(
        &self,
        _collection: &str,
        _query: &[f32],
        _top_k: usize,
    ) -> docqa_rag::Result<Vec<SearchHit>> {
        Ok(Vec::new())
    }
}

fn records(n: usize) -> Vec<VectorRecord> {
    (0..n)
        .map(|i| VectorRecord { id: i as u64, vector: vec![0.5, 0.5], text: format!("chunk {i}") })
        .collect()
}

#[tokio::test]
async fn issues_ceil_n_over_b_batches() {
    // 120 records in batches of 50 -> 50 + 50 + 20.
    let store = CountingStore::default();
    upsert_batched(&store, "docs", &records(120), 50).await.unwrap();
    assert_eq!(*store.batch_sizes.lock().unwrap(), vec![50, 50, 20]);
}

#[tokio::test]
async fn exact_multiple_has_no_trailing_batch() {
    let store = CountingStore::default();
    upsert_batched(&store, "docs", &records(100), 50).await.unwrap();
    assert_eq!(*store.batch_sizes.lock().unwrap(), vec![50, 50]);
}

#[tokio::test]
async fn fewer_records_than_batch_size_is_one_batch() {
    let store = CountingStore::default();
    upsert_batched(&store, "docs", &records(7), 50).await.unwrap();
    assert_eq!(*store.batch_sizes.lock().unwrap(), vec![7]);
}

#[tokio::test]
async fn no_records_issues_no_batches() {
    let store = CountingStore::default();
    upsert_batched(&store, "docs", &[], 50).await.unwrap();
    assert!(store.batch_sizes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failure_reports_committed_count_and_aborts() {
    // Second batch fails: exactly 50 records were acknowledged, and no
    // further batches are attempted.
    let store = CountingStore::failing_at(1);
    let err = upsert_batched(&store, "docs", &records(120), 50).await.unwrap_err();
    match err {
        RagError::IndexWriteFailed { committed, message } => {
            assert_eq!(committed, 50);
            assert!(message.contains("connection reset"));
        }
        other => panic!("expected IndexWriteFailed, got {other:?}"),
    }
    assert_eq!(*store.batch_sizes.lock().unwrap(), vec![50]);
}

#[tokio::test]
async fn first_batch_failure_commits_nothing() {
    let store = CountingStore::failing_at(0);
    let err = upsert_batched(&store, "docs", &records(10), 4).await.unwrap_err();
    assert!(matches!(err, RagError::IndexWriteFailed { committed: 0, .. }));
}

#[tokio::test]
async fn zero_batch_size_is_invalid() {
    let store = CountingStore::default();
    let err = upsert_batched(&store, "docs", &records(10), 0).await.unwrap_err();
    assert!(matches!(err, RagError::InvalidConfiguration(_)));
}
