//! In-memory vector store tests: search ordering, dimension checks,
//! and empty-collection semantics.

use docqa_rag::record::VectorRecord;
use docqa_rag::{InMemoryVectorStore, RagError, VectorStore};
use proptest::prelude::*;

/// Generate a non-zero L2-normalized vector of the given dimension.
fn arb_normalized_vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero vector", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

const DIM: usize = 16;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search results are ordered by descending cosine similarity and
    /// bounded by both top_k and the number of stored records.
    #[test]
    fn results_ordered_descending_and_bounded_by_top_k(
        vectors in proptest::collection::vec(arb_normalized_vector(DIM), 1..20),
        query in arb_normalized_vector(DIM),
        top_k in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (hits, count) = rt.block_on(async {
            let store = InMemoryVectorStore::new();
            store.recreate_collection("test", DIM).await.unwrap();

            let records: Vec<VectorRecord> = vectors
                .iter()
                .enumerate()
                .map(|(i, v)| VectorRecord {
                    id: i as u64,
                    vector: v.clone(),
                    text: format!("chunk {i}"),
                })
                .collect();
            let count = records.len();

            store.upsert("test", &records).await.unwrap();
            let hits = store.search("test", &query, top_k).await.unwrap();
            (hits, count)
        });

        prop_assert!(hits.len() <= top_k);
        prop_assert!(hits.len() <= count);
        for window in hits.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}

fn record(id: u64, vector: Vec<f32>, text: &str) -> VectorRecord {
    VectorRecord { id, vector, text: text.to_string() }
}

#[tokio::test]
async fn search_on_fresh_collection_returns_empty() {
    let store = InMemoryVectorStore::new();
    store.recreate_collection("docs", 3).await.unwrap();
    let hits = store.search("docs", &[1.0, 0.0, 0.0], 5).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn search_on_missing_collection_returns_empty() {
    let store = InMemoryVectorStore::new();
    let hits = store.search("nowhere", &[1.0, 0.0, 0.0], 5).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn self_retrieval_returns_inserted_record_first() {
    let store = InMemoryVectorStore::new();
    store.recreate_collection("docs", 3).await.unwrap();
    store
        .upsert(
            "docs",
            &[
                record(0, vec![1.0, 0.0, 0.0], "alpha"),
                record(1, vec![0.0, 1.0, 0.0], "beta"),
                record(2, vec![0.0, 0.0, 1.0], "gamma"),
            ],
        )
        .await
        .unwrap();

    let hits = store.search("docs", &[0.0, 1.0, 0.0], 1).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "beta");
}

#[tokio::test]
async fn upsert_with_wrong_dimension_fails() {
    let store = InMemoryVectorStore::new();
    store.recreate_collection("docs", 3).await.unwrap();

    let err = store.upsert("docs", &[record(0, vec![1.0, 0.0], "short")]).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));

    // The failing batch must not be partially applied.
    let hits = store.search("docs", &[1.0, 0.0, 0.0], 5).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn search_with_wrong_dimension_fails() {
    let store = InMemoryVectorStore::new();
    store.recreate_collection("docs", 3).await.unwrap();

    let err = store.search("docs", &[1.0, 0.0], 5).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));
}

#[tokio::test]
async fn recreate_collection_wipes_existing_data() {
    let store = InMemoryVectorStore::new();
    store.recreate_collection("docs", 3).await.unwrap();
    store.upsert("docs", &[record(0, vec![1.0, 0.0, 0.0], "old")]).await.unwrap();

    store.recreate_collection("docs", 3).await.unwrap();
    let hits = store.search("docs", &[1.0, 0.0, 0.0], 5).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn upsert_into_missing_collection_fails() {
    let store = InMemoryVectorStore::new();
    let err = store.upsert("nowhere", &[record(0, vec![1.0], "x")]).await.unwrap_err();
    assert!(matches!(err, RagError::IndexUnavailable { .. }));
}
