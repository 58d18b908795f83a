//! Server-specific configuration.

/// Bind address and CORS settings, read from the environment on top of
/// the shared [`docqa_rag::Settings`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origin allowed by CORS, typically the frontend dev server.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load `HOST`, `PORT`, and `ALLOWED_ORIGIN` from the environment,
    /// falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| anyhow::anyhow!("PORT must be a port number, got {raw:?}"))?,
            Err(_) => defaults.port,
        };
        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            allowed_origin: std::env::var("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
        })
    }
}
