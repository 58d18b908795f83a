//! Error types for the `docqa-rag` crate.

use thiserror::Error;

/// Errors that can occur in the retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// Bad chunking parameters or missing credentials. Fatal at startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An embedding provider call failed.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector index could not be reached or refused the request.
    #[error("Vector index unavailable: {message}")]
    IndexUnavailable {
        /// A description of the connectivity or auth failure.
        message: String,
    },

    /// A batched upsert aborted partway through.
    ///
    /// `committed` counts the records that were durably acknowledged
    /// before the failing batch, so callers can see how far indexing got.
    #[error("Index write failed after {committed} committed records: {message}")]
    IndexWriteFailed {
        /// Records acknowledged by the index before the failure.
        committed: usize,
        /// A description of the failure.
        message: String,
    },

    /// A vector's length does not match the collection's dimensionality.
    #[error("Dimension mismatch: collection expects {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality fixed at collection creation.
        expected: usize,
        /// The length of the offending vector.
        actual: usize,
    },

    /// The answer-generation provider returned an error.
    #[error("Generation failed ({provider}): {message}")]
    GenerationFailed {
        /// The completion provider that produced the error.
        provider: String,
        /// The underlying provider error.
        message: String,
    },
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
