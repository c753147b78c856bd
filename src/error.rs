//! Error types for the news RAG system

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// News pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// GCP authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// Document store error
    #[error("Document store error: {0}")]
    DocumentStore(String),

    /// Generative model error
    #[error("Generation error: {0}")]
    Generation(String),

    /// Entity analysis error
    #[error("Entity analysis error: {0}")]
    EntityAnalysis(String),

    /// Bulk source / sampling error
    #[error("Sampling error: {0}")]
    Sampling(String),

    /// Filtered pool cannot satisfy the requested sample size
    #[error("Filtered dataset has only {available} rows; {requested} requested")]
    SamplePoolTooSmall { available: usize, requested: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector index error
    pub fn vector_index(message: impl Into<String>) -> Self {
        Self::VectorIndex(message.into())
    }

    /// Create a document store error
    pub fn document_store(message: impl Into<String>) -> Self {
        Self::DocumentStore(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a sampling error
    pub fn sampling(message: impl Into<String>) -> Self {
        Self::Sampling(message.into())
    }
}
