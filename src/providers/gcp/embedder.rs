//! Vertex AI text embeddings via the `:predict` endpoint
//!
//! The deployed index and all stored vectors use text-embedding-004, which
//! produces 768-dimension vectors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::auth::GcpAuth;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

const EMBEDDING_DIMENSIONS: usize = 768;

/// Vertex AI embedding provider
pub struct VertexEmbedder {
    auth: GcpAuth,
    location: String,
    model: String,
}

impl VertexEmbedder {
    /// Create an embedder for the given region and model
    pub fn new(auth: GcpAuth, location: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            auth,
            location: location.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{proj}/locations/{loc}/publishers/google/models/{model}:predict",
            loc = self.location,
            proj = self.auth.project_id(),
            model = self.model,
        )
    }
}

#[derive(Serialize)]
struct EmbedRequest {
    instances: Vec<EmbedInstance>,
}

#[derive(Serialize)]
struct EmbedInstance {
    content: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    predictions: Vec<EmbedPrediction>,
}

#[derive(Deserialize)]
struct EmbedPrediction {
    embeddings: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for VertexEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let client = self.auth.authorized_client().await?;

        let request = EmbedRequest {
            instances: vec![EmbedInstance {
                content: text.to_string(),
            }],
        };

        let response = client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Vertex AI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Vertex AI embedding failed ({}): {}",
                status, body
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse Vertex AI response: {}", e)))?;

        parsed
            .predictions
            .into_iter()
            .next()
            .map(|p| p.embeddings.values)
            .ok_or_else(|| Error::Embedding("No embedding in response".to_string()))
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }

    fn name(&self) -> &str {
        "vertex-embeddings"
    }
}
