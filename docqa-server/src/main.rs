use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use docqa_rag::{
    OpenAiGenerator, QdrantVectorStore, RagPipeline, Settings, embedder_from_settings,
};
use docqa_server::{AppState, ServerConfig, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("loading deployment settings")?;
    let server_config = ServerConfig::from_env()?;

    let embedder = embedder_from_settings(&settings)?;
    let store = Arc::new(QdrantVectorStore::new(
        &settings.qdrant_url,
        settings.qdrant_api_key.clone(),
    )?);
    let pipeline = Arc::new(
        RagPipeline::builder()
            .config(settings.rag.clone())
            .embedder(embedder)
            .store(store)
            .collection(&settings.collection_name)
            .build()?,
    );

    let openai_api_key = settings
        .openai_api_key
        .clone()
        .context("OPENAI_API_KEY is required for answer generation")?;
    let generator = Arc::new(OpenAiGenerator::new(openai_api_key)?);

    run_server(server_config, AppState { pipeline, generator }).await
}
