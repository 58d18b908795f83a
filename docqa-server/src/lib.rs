//! # docqa-server
//!
//! axum HTTP service for the DocQA backend. One endpoint answers
//! questions grounded in the vector index (`POST /query`), plus a
//! health check (`GET /`). The pipeline and answer generator are
//! constructed once at startup and injected into handlers via state.

pub mod config;
pub mod server;

pub use config::ServerConfig;
pub use server::{AppState, app_router, run_server};
