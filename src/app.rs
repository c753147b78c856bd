//! Application context
//!
//! Builds the provider set once from validated configuration and hands
//! shared handles to the ingestion pipeline and the agent. Everything is
//! a trait object so tests can swap in-memory doubles for the hosted
//! services.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::providers::gcp::{
    FirestoreStore, GcpAuth, GeminiModel, LanguageApiAnalyzer, VertexEmbedder, VertexVectorSearch,
};
use crate::providers::{
    DocumentStore, EmbeddingProvider, EntityAnalyzer, GenerativeModel, VectorIndex,
};

/// Shared provider handles for one process.
pub struct AppContext {
    pub config: AppConfig,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub generative: Arc<dyn GenerativeModel>,
    pub document_store: Arc<dyn DocumentStore>,
    pub entity_api: Arc<dyn EntityAnalyzer>,
    /// `None` when no index is configured. Ingestion then stores records
    /// without index entries; the agent refuses to start.
    pub vector_index: Option<Arc<dyn VectorIndex>>,
}

impl AppContext {
    /// Wire every provider against one authenticated credential.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.ingest.request_timeout_secs);
        let auth = GcpAuth::from_key_file(
            &config.gcp.service_account_key_path,
            config.gcp.project_id.clone(),
            timeout,
        )
        .await?;

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(VertexEmbedder::new(
            auth.clone(),
            config.gcp.location.clone(),
            config.models.embedding_model.clone(),
        ));
        let generative: Arc<dyn GenerativeModel> = Arc::new(GeminiModel::new(
            auth.clone(),
            config.gcp.location.clone(),
            config.models.generation_model.clone(),
        ));
        let document_store: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(
            auth.clone(),
            config.gcp.firestore_collection.clone(),
        ));
        let entity_api: Arc<dyn EntityAnalyzer> = Arc::new(LanguageApiAnalyzer::new(auth.clone()));

        let vector_index: Option<Arc<dyn VectorIndex>> = if config.vector_search.is_configured() {
            Some(Arc::new(VertexVectorSearch::new(
                auth,
                config.gcp.location.clone(),
                config.vector_search.index.clone(),
                config.vector_search.endpoint.clone(),
                config.vector_search.public_domain.clone(),
                config.vector_search.deployed_index_id.clone(),
            )))
        } else {
            warn!("vector search is not configured");
            None
        };

        info!(project_id = %config.gcp.project_id, "application context ready");
        Ok(Self {
            config,
            embedder,
            generative,
            document_store,
            entity_api,
            vector_index,
        })
    }

    /// The configured vector index, or an error naming what is missing.
    pub fn require_vector_index(&self) -> Result<Arc<dyn VectorIndex>> {
        self.vector_index.clone().ok_or_else(|| {
            Error::config(
                "vector_search.index, vector_search.endpoint and vector_search.deployed_index_id must be set",
            )
        })
    }
}
