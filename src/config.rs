//! Configuration for the news RAG system
//!
//! Loaded from a TOML file, with environment overrides for the values that
//! differ per deployment (project, bucket, credentials).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// GCP project and credential settings
    #[serde(default)]
    pub gcp: GcpConfig,
    /// Model names
    #[serde(default)]
    pub models: ModelConfig,
    /// Vector Search resource names
    #[serde(default)]
    pub vector_search: VectorSearchConfig,
    /// Bulk article source
    #[serde(default)]
    pub source: SourceConfig,
    /// Ingestion tuning
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// GCP project and credential settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    /// GCP project ID
    #[serde(default)]
    pub project_id: String,
    /// GCP region (e.g., "us-central1")
    #[serde(default = "default_location")]
    pub location: String,
    /// GCS bucket holding the raw dataset
    #[serde(default)]
    pub bucket: String,
    /// Path to the service account JSON key file
    #[serde(default)]
    pub service_account_key_path: PathBuf,
    /// Firestore collection for enriched records
    #[serde(default = "default_collection")]
    pub firestore_collection: String,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: default_location(),
            bucket: String::new(),
            service_account_key_path: PathBuf::new(),
            firestore_collection: default_collection(),
        }
    }
}

/// Model names for the Vertex AI providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Embedding model (default: "text-embedding-004", 768 dimensions)
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Generative model (default: "gemini-2.5-flash")
    #[serde(default = "default_generation_model")]
    pub generation_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
        }
    }
}

/// Vertex AI Vector Search resource names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorSearchConfig {
    /// Full index resource name (for upserts),
    /// e.g. "projects/p/locations/us-central1/indexes/123"
    #[serde(default)]
    pub index: String,
    /// Full index endpoint resource name (for queries)
    #[serde(default)]
    pub endpoint: String,
    /// Deployed index ID within the endpoint
    #[serde(default)]
    pub deployed_index_id: String,
    /// Public endpoint domain, required for public endpoints
    #[serde(default)]
    pub public_domain: Option<String>,
}

impl VectorSearchConfig {
    /// True when all resource names needed to reach the index are present.
    /// Ingestion treats an unconfigured index as "skip upserts"; the agent
    /// refuses to start without one.
    pub fn is_configured(&self) -> bool {
        !self.index.is_empty() && !self.endpoint.is_empty() && !self.deployed_index_id.is_empty()
    }
}

/// Bulk article source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Object path of the JSONL dataset inside the bucket
    #[serde(default = "default_source_object")]
    pub object: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            object: default_source_object(),
        }
    }
}

/// Ingestion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Concurrent rows in flight (default: CPU count, capped at 4)
    #[serde(default)]
    pub parallel_rows: Option<usize>,
    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            parallel_rows: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl IngestConfig {
    /// Resolved worker count
    pub fn effective_parallel_rows(&self) -> usize {
        self.parallel_rows
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }
}

fn default_location() -> String {
    "us-central1".to_string()
}
fn default_collection() -> String {
    "news_articles".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}
fn default_generation_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_source_object() -> String {
    "xsum/train.jsonl".to_string()
}
fn default_request_timeout() -> u64 {
    120
}

impl AppConfig {
    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let mut config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a config file
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(project) = std::env::var("GCP_PROJECT_ID") {
            self.gcp.project_id = project;
        }
        if let Ok(location) = std::env::var("GCP_LOCATION") {
            self.gcp.location = location;
        }
        if let Ok(bucket) = std::env::var("GCS_BUCKET_NAME") {
            self.gcp.bucket = bucket;
        }
        if let Ok(key_path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            self.gcp.service_account_key_path = PathBuf::from(key_path);
        }
        if let Ok(collection) = std::env::var("FIRESTORE_COLLECTION") {
            self.gcp.firestore_collection = collection;
        }
    }

    /// Provenance URI of the raw dataset blob
    pub fn source_gcs_uri(&self) -> String {
        format!("gs://{}/{}", self.gcp.bucket, self.source.object)
    }

    /// Validate the fields every run needs
    pub fn validate(&self) -> Result<()> {
        if self.gcp.project_id.is_empty() {
            return Err(Error::config("gcp.project_id is not set"));
        }
        if self.gcp.bucket.is_empty() {
            return Err(Error::config("gcp.bucket is not set"));
        }
        if self.gcp.service_account_key_path.as_os_str().is_empty() {
            return Err(Error::config("gcp.service_account_key_path is not set"));
        }
        Ok(())
    }
}
