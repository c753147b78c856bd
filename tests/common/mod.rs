//! In-memory doubles for the provider traits, shared across integration
//! tests. Each fake records what it was asked so tests can assert on the
//! traffic, and each can be switched into a failing mode.

// Each integration binary uses its own subset of these fakes.
#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use newsroom_rag::error::{Error, Result};
use newsroom_rag::ingest::source::{filter_by_word_count, sample_rows};
use newsroom_rag::ingest::ArticleSource;
use newsroom_rag::providers::{
    DocumentStore, EmbeddingProvider, EntityAnalyzer, GenerativeModel, Neighbor, VectorIndex,
};
use newsroom_rag::types::{ApiEntity, ArticleRecord, ArticleRow, StructuredExtraction};

/// Deterministic embedder; equal text embeds to equal vectors.
#[derive(Default)]
pub struct MockEmbedder {
    /// Fail any text containing this marker.
    pub fail_on: Option<String>,
}

impl MockEmbedder {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(marker) = &self.fail_on {
            if text.contains(marker) {
                return Err(Error::embedding("simulated embedding outage"));
            }
        }
        let mut vector = vec![0.0f32; 8];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % 8] += f32::from(byte) / 255.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

/// Canned generative model that records every prompt it receives.
pub struct StubGenerativeModel {
    reply: String,
    json_reply: String,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerativeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            json_reply: "{}".to_string(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_json_reply(mut self, json_reply: &str) -> Self {
        self.json_reply = json_reply.to_string();
        self
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            json_reply: String::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerativeModel for StubGenerativeModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if self.fail {
            return Err(Error::generation("simulated model outage"));
        }
        Ok(self.reply.clone())
    }

    async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if self.fail {
            return Err(Error::generation("simulated model outage"));
        }
        Ok(self.json_reply.clone())
    }

    fn name(&self) -> &str {
        "stub-generative"
    }

    fn model(&self) -> &str {
        "stub"
    }
}

/// Vector index returning a fixed neighbor list and recording upserts.
pub struct InMemoryVectorIndex {
    neighbors: Vec<Neighbor>,
    upserts: RwLock<Vec<(String, Vec<f32>)>>,
    pub fail_find: bool,
    pub fail_upsert: bool,
}

impl InMemoryVectorIndex {
    pub fn returning(ids: &[&str]) -> Self {
        let neighbors = ids
            .iter()
            .enumerate()
            .map(|(rank, id)| Neighbor {
                id: (*id).to_string(),
                distance: 0.1 * (rank as f64 + 1.0),
            })
            .collect();
        Self {
            neighbors,
            upserts: RwLock::new(Vec::new()),
            fail_find: false,
            fail_upsert: false,
        }
    }

    pub fn empty() -> Self {
        Self::returning(&[])
    }

    pub fn upserted_ids(&self) -> Vec<String> {
        self.upserts.read().iter().map(|(id, _)| id.clone()).collect()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn find_neighbors(&self, _embedding: &[f32], count: usize) -> Result<Vec<Neighbor>> {
        if self.fail_find {
            return Err(Error::vector_index("simulated index outage"));
        }
        Ok(self.neighbors.iter().take(count).cloned().collect())
    }

    async fn upsert(&self, id: &str, embedding: &[f32]) -> Result<()> {
        if self.fail_upsert {
            return Err(Error::vector_index("simulated upsert failure"));
        }
        self.upserts.write().push((id.to_string(), embedding.to_vec()));
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory-index"
    }
}

/// Hash-map document store.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, ArticleRecord>>,
    pub fail_get: bool,
    pub fail_set: bool,
}

impl InMemoryStore {
    pub fn with_records(entries: Vec<(&str, ArticleRecord)>) -> Self {
        let records = entries
            .into_iter()
            .map(|(id, record)| (id.to_string(), record))
            .collect();
        Self {
            records: RwLock::new(records),
            fail_get: false,
            fail_set: false,
        }
    }

    pub fn stored_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn record(&self, id: &str) -> Option<ArticleRecord> {
        self.records.read().get(id).cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, id: &str) -> Result<Option<ArticleRecord>> {
        if self.fail_get {
            return Err(Error::document_store("simulated store outage"));
        }
        Ok(self.records.read().get(id).cloned())
    }

    async fn set(&self, id: &str, record: &ArticleRecord) -> Result<()> {
        if self.fail_set {
            return Err(Error::document_store("simulated store outage"));
        }
        self.records.write().insert(id.to_string(), record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory-store"
    }
}

/// Entity analyzer with a fixed reply.
#[derive(Default)]
pub struct StubEntityAnalyzer {
    pub entities: Vec<ApiEntity>,
    pub fail: bool,
}

#[async_trait]
impl EntityAnalyzer for StubEntityAnalyzer {
    async fn analyze_entities(&self, _text: &str) -> Result<Vec<ApiEntity>> {
        if self.fail {
            return Err(Error::generation("simulated analysis outage"));
        }
        Ok(self.entities.clone())
    }

    fn name(&self) -> &str {
        "stub-entity-analyzer"
    }
}

/// Source backed by a fixed row list; reuses the real filter and sampler.
pub struct StubArticleSource {
    pub rows: Vec<ArticleRow>,
}

#[async_trait]
impl ArticleSource for StubArticleSource {
    async fn sample(
        &self,
        n: usize,
        max_words: Option<usize>,
        seed: u64,
    ) -> Result<Vec<ArticleRow>> {
        let pool = filter_by_word_count(self.rows.clone(), max_words);
        sample_rows(pool, n, seed)
    }

    fn name(&self) -> &str {
        "stub-source"
    }
}

pub fn article_row(id: &str, document: &str) -> ArticleRow {
    ArticleRow {
        id: id.to_string(),
        document: document.to_string(),
        summary: format!("Reference summary for {id}."),
    }
}

pub fn stored_record(summary: &str, main_topic: &str) -> ArticleRecord {
    ArticleRecord {
        gemini_summary: summary.to_string(),
        vertex_ai_extraction: StructuredExtraction {
            main_event_or_topic: main_topic.to_string(),
            ..StructuredExtraction::default()
        },
        ..ArticleRecord::default()
    }
}
