//! Router, handlers, and error mapping for the query service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use docqa_rag::{AnswerGenerator, RagError, RagPipeline};

use crate::config::ServerConfig;

/// Shared handler state: the pipeline and generator are constructed
/// once at startup and cloned by `Arc` into each request.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval pipeline over the vector index.
    pub pipeline: Arc<RagPipeline>,
    /// Answer-generation adapter.
    pub generator: Arc<dyn AnswerGenerator>,
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    question: String,
    /// Falls back to the configured `top_k` (default 5) when omitted.
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    answer: String,
}

/// Maps pipeline errors to explicit JSON error responses. A failed
/// query is reported as a failure, never degraded into a made-up
/// answer; zero retrieval hits are not an error and never reach this.
struct ApiError(RagError);

impl From<RagError> for ApiError {
    fn from(e: RagError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RagError::InvalidConfiguration(_) | RagError::DimensionMismatch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RagError::Embedding { .. }
            | RagError::IndexUnavailable { .. }
            | RagError::IndexWriteFailed { .. }
            | RagError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Build the application router.
pub fn app_router(state: AppState, allowed_origin: &str) -> Router {
    let cors = match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any),
        Err(_) => {
            warn!(allowed_origin, "invalid CORS origin, allowing any");
            CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
        }
    };

    Router::new()
        .route("/", get(health))
        .route("/query", post(query))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown.
pub async fn run_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state, &config.allowed_origin);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for docqa-server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("docqa-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let top_k = request.top_k.unwrap_or(state.pipeline.config().top_k);
    info!(question = %request.question, top_k, "query received");

    // A blank question (image-only request) skips retrieval entirely.
    let context = if request.question.trim().is_empty() {
        String::new()
    } else {
        state.pipeline.retrieve(&request.question, top_k).await?
    };

    let answer = state
        .generator
        .answer(&context, &request.question, request.image_base64.as_deref())
        .await?;

    Ok(Json(QueryResponse { answer }))
}
