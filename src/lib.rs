//! newsroom-rag: retrieval-augmented question answering over a news archive
//!
//! Two halves share one provider stack. The ingestion pipeline samples
//! articles from Cloud Storage, enriches each one with summaries, entity
//! views and an embedding, then persists records to Firestore and vectors
//! to Vertex AI Vector Search. The agent answers questions by retrieving
//! neighbor ids, assembling stored context and synthesizing a cited report.

pub mod agent;
pub mod app;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod types;

pub use agent::NewsAgent;
pub use app::AppContext;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use ingest::{IngestPipeline, IngestReport};
pub use types::{
    article::{ApiEntity, ArticleRecord, ArticleRow, EntityMention, StructuredExtraction},
    context::SourceContext,
};
