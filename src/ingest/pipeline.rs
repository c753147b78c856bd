//! Ingestion pipeline
//!
//! Samples rows from an [`ArticleSource`], enriches each one, then writes
//! the record to the document store and the embedding to the vector index.
//! Sampling failures abort before anything is written; after that, a bad
//! row is skipped and the run keeps going.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::app::AppContext;
use crate::enrichment::Enricher;
use crate::error::Result;
use crate::ingest::source::ArticleSource;
use crate::providers::{DocumentStore, EmbeddingProvider, VectorIndex};
use crate::types::ArticleRow;

/// Counters from one ingestion run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows the source handed over.
    pub sampled: usize,
    /// Rows persisted to the document store.
    pub stored: usize,
    /// Rows dropped after a failed embedding or store write.
    pub skipped: usize,
    /// Stored rows whose index upsert failed.
    pub vector_upserts_failed: usize,
}

enum RowOutcome {
    Stored { upsert_failed: bool },
    Skipped,
}

/// Drives one end-to-end ingestion run.
pub struct IngestPipeline {
    source: Arc<dyn ArticleSource>,
    enricher: Enricher,
    embedder: Arc<dyn EmbeddingProvider>,
    document_store: Arc<dyn DocumentStore>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    gcs_uri: String,
    parallel_rows: usize,
}

impl IngestPipeline {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        enricher: Enricher,
        embedder: Arc<dyn EmbeddingProvider>,
        document_store: Arc<dyn DocumentStore>,
        vector_index: Option<Arc<dyn VectorIndex>>,
        gcs_uri: String,
        parallel_rows: usize,
    ) -> Self {
        Self {
            source,
            enricher,
            embedder,
            document_store,
            vector_index,
            gcs_uri,
            parallel_rows: parallel_rows.max(1),
        }
    }

    pub fn from_context(context: &AppContext, source: Arc<dyn ArticleSource>) -> Self {
        Self::new(
            source,
            Enricher::new(
                Arc::clone(&context.generative),
                Arc::clone(&context.entity_api),
            ),
            Arc::clone(&context.embedder),
            Arc::clone(&context.document_store),
            context.vector_index.clone(),
            context.config.source_gcs_uri(),
            context.config.ingest.effective_parallel_rows(),
        )
    }

    /// Run the pipeline over a fresh sample.
    ///
    /// Fails only before the first write, e.g. when the filtered pool is
    /// smaller than `sample_size`.
    pub async fn run(
        &self,
        sample_size: usize,
        max_words: Option<usize>,
        seed: u64,
    ) -> Result<IngestReport> {
        let rows = self.source.sample(sample_size, max_words, seed).await?;
        info!(
            rows = rows.len(),
            source = self.source.name(),
            "sampled articles for ingestion"
        );
        if self.vector_index.is_none() {
            warn!("vector index not configured, embeddings will not be upserted");
        }

        let outcomes: Vec<RowOutcome> = stream::iter(rows)
            .map(|row| self.ingest_row(row))
            .buffer_unordered(self.parallel_rows)
            .collect()
            .await;

        let mut report = IngestReport {
            sampled: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                RowOutcome::Stored { upsert_failed } => {
                    report.stored += 1;
                    if upsert_failed {
                        report.vector_upserts_failed += 1;
                    }
                }
                RowOutcome::Skipped => report.skipped += 1,
            }
        }

        info!(
            sampled = report.sampled,
            stored = report.stored,
            skipped = report.skipped,
            upserts_failed = report.vector_upserts_failed,
            "ingestion run complete"
        );
        Ok(report)
    }

    async fn ingest_row(&self, row: ArticleRow) -> RowOutcome {
        let record = self.enricher.enrich(&row, &self.gcs_uri).await;

        let embedding = match self.embedder.embed(&row.document).await {
            Ok(vector) => vector,
            Err(e) => {
                error!(article_id = %row.id, error = %e, "Could not create embedding, skipping row");
                return RowOutcome::Skipped;
            }
        };

        if let Err(e) = self.document_store.set(&row.id, &record).await {
            error!(article_id = %row.id, error = %e, "Could not persist record, skipping row");
            return RowOutcome::Skipped;
        }

        let mut upsert_failed = false;
        if let Some(index) = &self.vector_index {
            if let Err(e) = index.upsert(&row.id, &embedding).await {
                warn!(
                    article_id = %row.id,
                    error = %e,
                    "vector upsert failed, record stored without an index entry"
                );
                upsert_failed = true;
            }
        }

        info!(article_id = %row.id, "article ingested");
        RowOutcome::Stored { upsert_failed }
    }
}
