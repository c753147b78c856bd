//! Article enrichment
//!
//! Turns a sampled article into the record the document store keeps: a
//! generative summary, an extractive baseline summary, a structured
//! extraction, API entity annotations and a rule-based entity baseline.
//! Remote fields degrade to their defaults on failure so one flaky call
//! never drops a row.

pub mod entities;
pub mod extraction;
pub mod textrank;

pub use entities::RuleBasedNer;
pub use extraction::ExtractionParser;
pub use textrank::TextRankSummarizer;

use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::prompts::PromptBuilder;
use crate::providers::{EntityAnalyzer, GenerativeModel};
use crate::types::{ApiEntity, ArticleRecord, ArticleRow, EntityMention, StructuredExtraction};

/// Produces every enrichment field for a sampled article.
pub struct Enricher {
    generative: Arc<dyn GenerativeModel>,
    entity_api: Arc<dyn EntityAnalyzer>,
    parser: ExtractionParser,
    textrank: TextRankSummarizer,
    ner: RuleBasedNer,
}

impl Enricher {
    pub fn new(generative: Arc<dyn GenerativeModel>, entity_api: Arc<dyn EntityAnalyzer>) -> Self {
        Self {
            generative,
            entity_api,
            parser: ExtractionParser::default(),
            textrank: TextRankSummarizer::default(),
            ner: RuleBasedNer::default(),
        }
    }

    /// One-sentence abstractive summary from the generative model.
    pub async fn summarize_abstractive(&self, document: &str) -> Result<String> {
        let prompt = PromptBuilder::build_summary_prompt(document);
        let reply = self.generative.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }

    /// Schema-guided extraction via the model's JSON mode.
    pub async fn extract_structured(&self, document: &str) -> Result<StructuredExtraction> {
        let prompt = PromptBuilder::build_extraction_prompt(document);
        let reply = self.generative.generate_json(&prompt).await?;
        self.parser.parse(&reply)
    }

    /// Entity annotations from the hosted analysis API.
    pub async fn analyze_api_entities(&self, document: &str) -> Result<Vec<ApiEntity>> {
        self.entity_api.analyze_entities(document).await
    }

    /// In-process extractive summary; never fails.
    pub fn summarize_extractive(&self, document: &str) -> String {
        self.textrank.summarize(document)
    }

    /// In-process entity baseline; never fails.
    pub fn baseline_entities(&self, document: &str) -> Vec<EntityMention> {
        self.ner.extract(document)
    }

    /// Build the full record for one sampled row.
    pub async fn enrich(&self, row: &ArticleRow, gcs_uri: &str) -> ArticleRecord {
        let gemini_summary = or_default_logged(
            "gemini_summary",
            &row.id,
            self.summarize_abstractive(&row.document).await,
        );
        let vertex_ai_extraction = or_default_logged(
            "vertex_ai_extraction",
            &row.id,
            self.extract_structured(&row.document).await,
        );
        let nl_api_entities = or_default_logged(
            "nl_api_entities",
            &row.id,
            self.analyze_api_entities(&row.document).await,
        );

        ArticleRecord {
            reference_summary: row.summary.clone(),
            gemini_summary,
            textrank_summary: self.summarize_extractive(&row.document),
            vertex_ai_extraction,
            nl_api_entities,
            spacy_entities: self.baseline_entities(&row.document),
            gcs_uri: gcs_uri.to_string(),
        }
    }
}

/// Per-field degradation: log the failure and store the field's default.
fn or_default_logged<T: Default>(field: &str, article_id: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(article_id, field, error = %e, "enrichment field failed, storing default");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn failed_fields_fall_back_to_defaults() {
        let degraded: String =
            or_default_logged("gemini_summary", "a1", Err(Error::generation("model offline")));
        assert!(degraded.is_empty());

        let entities: Vec<EntityMention> =
            or_default_logged("spacy_entities", "a1", Err(Error::generation("timeout")));
        assert!(entities.is_empty());
    }

    #[test]
    fn successful_fields_pass_through() {
        let kept = or_default_logged("gemini_summary", "a1", Ok("A short summary.".to_string()));
        assert_eq!(kept, "A short summary.");
    }
}
