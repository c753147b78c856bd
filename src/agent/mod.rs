//! Query-time news agent
//!
//! Answers a question in three forward steps: retrieve neighbor ids from
//! the vector index, assemble source context from the document store, then
//! synthesize a cited report with the generative model. The public entry
//! point always returns a user-facing string; every failure mode maps to a
//! fixed message instead of an error.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::app::AppContext;
use crate::error::Result;
use crate::prompts::PromptBuilder;
use crate::providers::{DocumentStore, EmbeddingProvider, GenerativeModel, VectorIndex};
use crate::types::SourceContext;

/// Reply when the index returns no neighbors for a query.
pub const NO_RESULTS_MESSAGE: &str =
    "I'm sorry, I could not find any relevant news articles for your query.";

/// Reply when neighbors were found but none resolved to stored records.
pub const EMPTY_CONTEXT_MESSAGE: &str =
    "I found some article references, but I was unable to retrieve their content from the database.";

/// Reply when the synthesis call itself fails.
pub const SYNTHESIS_FAILED_MESSAGE: &str = "There was an error while generating the final answer.";

/// Reply when retrieval infrastructure (embedding, index or store) fails.
pub const SEARCH_FAILED_MESSAGE: &str =
    "I'm sorry, something went wrong while searching the news archive. Please try again.";

/// Retrieval-augmented question answering over the ingested archive.
pub struct NewsAgent {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    document_store: Arc<dyn DocumentStore>,
    generative: Arc<dyn GenerativeModel>,
    top_k: usize,
}

impl NewsAgent {
    pub const DEFAULT_TOP_K: usize = 10;

    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        document_store: Arc<dyn DocumentStore>,
        generative: Arc<dyn GenerativeModel>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            vector_index,
            document_store,
            generative,
            top_k: top_k.max(1),
        }
    }

    /// Build an agent from a wired context. Fails when no vector index is
    /// configured.
    pub fn from_context(context: &AppContext, top_k: usize) -> Result<Self> {
        Ok(Self::new(
            Arc::clone(&context.embedder),
            context.require_vector_index()?,
            Arc::clone(&context.document_store),
            Arc::clone(&context.generative),
            top_k,
        ))
    }

    /// Answer a question. Never fails; infrastructure errors become
    /// [`SEARCH_FAILED_MESSAGE`].
    pub async fn answer(&self, query: &str) -> String {
        match self.answer_inner(query).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "query pipeline failed");
                SEARCH_FAILED_MESSAGE.to_string()
            }
        }
    }

    async fn answer_inner(&self, query: &str) -> Result<String> {
        let ids = self.find_relevant_articles(query).await?;
        if ids.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let sources = self.assemble_context(&ids).await?;
        if sources.is_empty() {
            return Ok(EMPTY_CONTEXT_MESSAGE.to_string());
        }

        Ok(self.synthesize(query, &sources).await)
    }

    /// Embed the query and return neighbor ids, nearest first.
    ///
    /// Ids come back exactly as the index reports them; a duplicate id
    /// yields duplicate source blocks downstream.
    pub async fn find_relevant_articles(&self, query: &str) -> Result<Vec<String>> {
        let embedding = self.embedder.embed(query).await?;
        let neighbors = self
            .vector_index
            .find_neighbors(&embedding, self.top_k)
            .await?;
        debug!(count = neighbors.len(), "retrieved neighbor ids");
        Ok(neighbors.into_iter().map(|n| n.id).collect())
    }

    /// Resolve neighbor ids to source contexts.
    ///
    /// An id missing from the store is logged and skipped; a store error
    /// aborts assembly.
    pub async fn assemble_context(&self, ids: &[String]) -> Result<Vec<SourceContext>> {
        let mut sources = Vec::with_capacity(ids.len());
        for id in ids {
            match self.document_store.get(id).await? {
                Some(record) => sources.push(SourceContext::from_record(id, &record)),
                None => warn!(article_id = %id, "indexed article missing from document store"),
            }
        }
        debug!(
            requested = ids.len(),
            resolved = sources.len(),
            "assembled source context"
        );
        Ok(sources)
    }

    /// Generate the cited report from assembled sources.
    pub async fn synthesize(&self, query: &str, sources: &[SourceContext]) -> String {
        let prompt = PromptBuilder::build_synthesis_prompt(query, sources);
        match self.generative.generate(&prompt).await {
            Ok(report) => report.trim().to_string(),
            Err(e) => {
                error!(error = %e, model = self.generative.name(), "synthesis failed");
                SYNTHESIS_FAILED_MESSAGE.to_string()
            }
        }
    }
}
