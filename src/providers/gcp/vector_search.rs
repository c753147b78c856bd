//! Vertex AI Vector Search provider
//!
//! Queries go to the index endpoint (`:findNeighbors`); upserts go to the
//! index resource (`:upsertDatapoints`). Datapoints are whole articles keyed
//! by article id; enriched content lives in the document store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::auth::GcpAuth;
use crate::error::{Error, Result};
use crate::providers::vector_index::{Neighbor, VectorIndex};

/// Vertex AI Vector Search client
pub struct VertexVectorSearch {
    auth: GcpAuth,
    location: String,
    /// Full index resource name, for upserts
    index: String,
    /// Full index endpoint resource name, for queries
    index_endpoint: String,
    /// Public endpoint domain, required when the endpoint is public
    public_domain: Option<String>,
    deployed_index_id: String,
}

impl VertexVectorSearch {
    /// Create a client for a deployed index
    pub fn new(
        auth: GcpAuth,
        location: impl Into<String>,
        index: impl Into<String>,
        index_endpoint: impl Into<String>,
        public_domain: Option<String>,
        deployed_index_id: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            location: location.into(),
            index: index.into(),
            index_endpoint: index_endpoint.into(),
            public_domain,
            deployed_index_id: deployed_index_id.into(),
        }
    }

    fn query_endpoint(&self) -> String {
        match &self.public_domain {
            Some(domain) => format!("https://{}/v1/{}:findNeighbors", domain, self.index_endpoint),
            None => format!(
                "https://{}-aiplatform.googleapis.com/v1/{}:findNeighbors",
                self.location, self.index_endpoint
            ),
        }
    }

    fn upsert_endpoint(&self) -> String {
        format!(
            "https://{}-aiplatform.googleapis.com/v1/{}:upsertDatapoints",
            self.location, self.index
        )
    }
}

#[derive(Serialize)]
struct FindNeighborsRequest {
    deployed_index_id: String,
    queries: Vec<QueryItem>,
}

#[derive(Serialize)]
struct QueryItem {
    datapoint: DataPoint,
    neighbor_count: u32,
}

#[derive(Serialize)]
struct DataPoint {
    datapoint_id: String,
    feature_vector: Vec<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindNeighborsResponse {
    #[serde(default)]
    nearest_neighbors: Vec<NearestNeighbors>,
}

#[derive(Deserialize)]
struct NearestNeighbors {
    #[serde(default)]
    neighbors: Vec<NeighborEntry>,
}

#[derive(Deserialize)]
struct NeighborEntry {
    datapoint: NeighborDatapoint,
    #[serde(default)]
    distance: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NeighborDatapoint {
    datapoint_id: String,
}

#[derive(Serialize)]
struct UpsertRequest {
    datapoints: Vec<DataPoint>,
}

#[async_trait]
impl VectorIndex for VertexVectorSearch {
    async fn find_neighbors(&self, embedding: &[f32], count: usize) -> Result<Vec<Neighbor>> {
        let client = self.auth.authorized_client().await?;

        let request = FindNeighborsRequest {
            deployed_index_id: self.deployed_index_id.clone(),
            queries: vec![QueryItem {
                datapoint: DataPoint {
                    datapoint_id: "query".to_string(),
                    feature_vector: embedding.to_vec(),
                },
                neighbor_count: count as u32,
            }],
        };

        let response = client
            .post(self.query_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Vertex search failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "Vertex search failed ({}): {}",
                status, body
            )));
        }

        let parsed: FindNeighborsResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse Vertex response: {}", e)))?;

        // One query in, one neighbor list out; rank order is the index's
        let neighbors = parsed
            .nearest_neighbors
            .into_iter()
            .next()
            .map(|n| n.neighbors)
            .unwrap_or_default()
            .into_iter()
            .map(|n| Neighbor {
                id: n.datapoint.datapoint_id,
                distance: n.distance,
            })
            .collect();

        Ok(neighbors)
    }

    async fn upsert(&self, id: &str, embedding: &[f32]) -> Result<()> {
        let client = self.auth.authorized_client().await?;

        let request = UpsertRequest {
            datapoints: vec![DataPoint {
                datapoint_id: id.to_string(),
                feature_vector: embedding.to_vec(),
            }],
        };

        let response = client
            .post(self.upsert_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Vertex upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "Vertex upsert failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "vertex-vector-search"
    }
}
