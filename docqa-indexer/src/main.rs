//! One-shot indexing job: extract text from a folder of PDFs, chunk
//! it, embed the chunks, and store them in Qdrant.
//!
//! The run is destructive: the collection is recreated from scratch,
//! so record ids never collide across runs. Run this whenever the
//! source documents change, then serve queries with `docqa-server`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docqa_extract::extract_folder;
use docqa_rag::{QdrantVectorStore, RagPipeline, Settings, embedder_from_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("loading deployment settings")?;
    let folder = PathBuf::from(std::env::var("PDF_FOLDER").unwrap_or_else(|_| "data".to_string()));

    info!(folder = %folder.display(), "extracting text from PDFs");
    let texts = extract_folder(&folder)?;
    if texts.is_empty() {
        bail!("no PDFs found or no text extracted from folder: {}", folder.display());
    }
    info!(document_count = texts.len(), "extraction complete");

    // Filename order (BTreeMap) keeps the combined corpus, and with it
    // the chunk ids, stable across runs.
    let combined: Vec<&str> = texts.values().map(String::as_str).collect();
    let combined = combined.join("\n");

    let embedder = embedder_from_settings(&settings)?;
    let store = Arc::new(QdrantVectorStore::new(
        &settings.qdrant_url,
        settings.qdrant_api_key.clone(),
    )?);
    let pipeline = RagPipeline::builder()
        .config(settings.rag.clone())
        .embedder(embedder)
        .store(store)
        .collection(&settings.collection_name)
        .build()?;

    info!(collection = %settings.collection_name, "recreating collection");
    pipeline.create_collection().await.context("creating collection")?;

    let stored = pipeline.index_text(&combined).await.context("indexing corpus")?;
    if stored == 0 {
        bail!("extracted text produced no chunks; nothing was indexed");
    }

    info!(
        collection = %settings.collection_name,
        chunk_count = stored,
        "indexing complete; run docqa-server to answer questions"
    );
    Ok(())
}
