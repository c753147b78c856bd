//! Vector index trait for nearest-neighbor search over article embeddings

use async_trait::async_trait;

use crate::error::Result;

/// One nearest-neighbor match from the index
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Article id of the matched datapoint
    pub id: String,
    /// Index-reported distance (smaller is closer)
    pub distance: f64,
}

/// Trait for embedding storage and nearest-neighbor lookup
///
/// Implementations:
/// - `VertexVectorSearch`: Google Vertex AI Vector Search
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `count` nearest neighbors for an embedding, nearest first
    async fn find_neighbors(&self, embedding: &[f32], count: usize) -> Result<Vec<Neighbor>>;

    /// Insert or overwrite the datapoint stored under `id`
    async fn upsert(&self, id: &str, embedding: &[f32]) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
