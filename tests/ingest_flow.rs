//! Pipeline behavior over in-memory providers: persistence, per-row
//! degradation and the pre-write abort.

mod common;

use std::sync::Arc;

use common::{
    article_row, InMemoryStore, InMemoryVectorIndex, MockEmbedder, StubArticleSource,
    StubEntityAnalyzer, StubGenerativeModel,
};
use newsroom_rag::enrichment::Enricher;
use newsroom_rag::error::Error;
use newsroom_rag::ingest::{IngestPipeline, IngestReport};
use newsroom_rag::providers::VectorIndex;
use newsroom_rag::types::{ApiEntity, ArticleRow};

const TEST_GCS_URI: &str = "gs://test-bucket/xsum/train.jsonl";

fn sample_entity() -> ApiEntity {
    ApiEntity {
        name: "Aberdeen Harbour Board".to_string(),
        entity_type: "ORGANIZATION".to_string(),
        salience: 0.42,
        wikipedia_url: None,
    }
}

fn pipeline_with(
    rows: Vec<ArticleRow>,
    model: Arc<StubGenerativeModel>,
    embedder: MockEmbedder,
    analyzer: StubEntityAnalyzer,
    store: Arc<InMemoryStore>,
    index: Option<Arc<InMemoryVectorIndex>>,
) -> IngestPipeline {
    let vector_index: Option<Arc<dyn VectorIndex>> = match index {
        Some(index) => Some(index),
        None => None,
    };
    IngestPipeline::new(
        Arc::new(StubArticleSource { rows }),
        Enricher::new(model, Arc::new(analyzer)),
        Arc::new(embedder),
        store,
        vector_index,
        TEST_GCS_URI.to_string(),
        2,
    )
}

#[tokio::test]
async fn stores_enriched_records_and_upserts_vectors() {
    let rows = vec![
        article_row(
            "a1",
            "The harbour wall reopened on Monday. Engineers repaired the damaged section.",
        ),
        article_row(
            "a2",
            "Ferry services resumed after the storm. Operators reported full bookings.",
        ),
    ];
    let model = Arc::new(
        StubGenerativeModel::replying("  The harbour wall reopened after repairs.  ").with_json_reply(
            r#"{"main_event_or_topic": "Harbour reopening", "key_locations": ["Aberdeen"]}"#,
        ),
    );
    let store = Arc::new(InMemoryStore::default());
    let index = Arc::new(InMemoryVectorIndex::empty());
    let pipeline = pipeline_with(
        rows,
        model,
        MockEmbedder::default(),
        StubEntityAnalyzer {
            entities: vec![sample_entity()],
            fail: false,
        },
        Arc::clone(&store),
        Some(Arc::clone(&index)),
    );

    let report = pipeline.run(2, None, 42).await.unwrap();
    assert_eq!(
        report,
        IngestReport {
            sampled: 2,
            stored: 2,
            skipped: 0,
            vector_upserts_failed: 0,
        }
    );

    assert_eq!(store.stored_ids(), vec!["a1", "a2"]);
    let record = store.record("a1").unwrap();
    assert_eq!(record.gemini_summary, "The harbour wall reopened after repairs.");
    assert_eq!(record.reference_summary, "Reference summary for a1.");
    assert!(!record.textrank_summary.is_empty());
    assert_eq!(record.vertex_ai_extraction.main_event_or_topic, "Harbour reopening");
    assert_eq!(record.vertex_ai_extraction.key_locations, vec!["Aberdeen"]);
    assert_eq!(record.nl_api_entities, vec![sample_entity()]);
    assert!(!record.spacy_entities.is_empty());
    assert_eq!(record.gcs_uri, TEST_GCS_URI);

    let mut upserted = index.upserted_ids();
    upserted.sort_unstable();
    assert_eq!(upserted, vec!["a1", "a2"]);
}

#[tokio::test]
async fn embedding_failure_skips_the_row() {
    let rows = vec![
        article_row("good", "A normal article about local news."),
        article_row("bad", "This article contains the POISON marker."),
    ];
    let store = Arc::new(InMemoryStore::default());
    let index = Arc::new(InMemoryVectorIndex::empty());
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::replying("Summary.")),
        MockEmbedder::failing_on("POISON"),
        StubEntityAnalyzer::default(),
        Arc::clone(&store),
        Some(Arc::clone(&index)),
    );

    let report = pipeline.run(2, None, 42).await.unwrap();
    assert_eq!(report.stored, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.stored_ids(), vec!["good"]);
    assert_eq!(index.upserted_ids(), vec!["good"]);
}

#[tokio::test]
async fn small_pool_aborts_before_any_write() {
    let rows = vec![article_row("only", "One short article.")];
    let store = Arc::new(InMemoryStore::default());
    let index = Arc::new(InMemoryVectorIndex::empty());
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::replying("Summary.")),
        MockEmbedder::default(),
        StubEntityAnalyzer::default(),
        Arc::clone(&store),
        Some(Arc::clone(&index)),
    );

    let err = pipeline.run(5, None, 42).await.unwrap_err();
    match err {
        Error::SamplePoolTooSmall {
            available,
            requested,
        } => {
            assert_eq!(available, 1);
            assert_eq!(requested, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.stored_ids().is_empty());
    assert!(index.upserted_ids().is_empty());
}

#[tokio::test]
async fn generative_outage_degrades_fields_but_keeps_the_row() {
    let rows = vec![article_row(
        "a1",
        "The bridge closed for inspection. Drivers were diverted through town.",
    )];
    let store = Arc::new(InMemoryStore::default());
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::failing()),
        MockEmbedder::default(),
        StubEntityAnalyzer {
            entities: vec![sample_entity()],
            fail: false,
        },
        Arc::clone(&store),
        None,
    );

    let report = pipeline.run(1, None, 42).await.unwrap();
    assert_eq!(report.stored, 1);
    assert_eq!(report.skipped, 0);

    let record = store.record("a1").unwrap();
    assert!(record.gemini_summary.is_empty());
    assert!(record.vertex_ai_extraction.is_empty());
    assert_eq!(record.nl_api_entities, vec![sample_entity()]);
    assert!(!record.textrank_summary.is_empty());
}

#[tokio::test]
async fn missing_index_stores_records_without_upserts() {
    let rows = vec![article_row("a1", "An article about a new library opening.")];
    let store = Arc::new(InMemoryStore::default());
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::replying("Summary.")),
        MockEmbedder::default(),
        StubEntityAnalyzer::default(),
        Arc::clone(&store),
        None,
    );

    let report = pipeline.run(1, None, 42).await.unwrap();
    assert_eq!(report.stored, 1);
    assert_eq!(report.vector_upserts_failed, 0);
    assert_eq!(store.stored_ids(), vec!["a1"]);
}

#[tokio::test]
async fn upsert_failure_counts_but_keeps_the_record() {
    let rows = vec![
        article_row("a1", "First article text."),
        article_row("a2", "Second article text."),
    ];
    let store = Arc::new(InMemoryStore::default());
    let mut index = InMemoryVectorIndex::empty();
    index.fail_upsert = true;
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::replying("Summary.")),
        MockEmbedder::default(),
        StubEntityAnalyzer::default(),
        Arc::clone(&store),
        Some(Arc::new(index)),
    );

    let report = pipeline.run(2, None, 42).await.unwrap();
    assert_eq!(report.stored, 2);
    assert_eq!(report.vector_upserts_failed, 2);
    assert_eq!(store.stored_ids(), vec!["a1", "a2"]);
}

#[tokio::test]
async fn word_limit_filters_the_sampling_pool() {
    let long_document = vec!["word"; 40].join(" ");
    let rows = vec![
        article_row("short1", "Five words of article text."),
        article_row("short2", "Another five word article here."),
        article_row("long", &long_document),
    ];
    let store = Arc::new(InMemoryStore::default());
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::replying("Summary.")),
        MockEmbedder::default(),
        StubEntityAnalyzer::default(),
        Arc::clone(&store),
        None,
    );

    let report = pipeline.run(2, Some(10), 42).await.unwrap();
    assert_eq!(report.sampled, 2);
    assert_eq!(store.stored_ids(), vec!["short1", "short2"]);
}

#[tokio::test]
async fn rerunning_the_same_sample_overwrites_identically() {
    let rows = vec![
        article_row("a1", "The harbour wall reopened on Monday."),
        article_row("a2", "Ferry services resumed after the storm."),
    ];
    let store = Arc::new(InMemoryStore::default());
    let pipeline = pipeline_with(
        rows,
        Arc::new(StubGenerativeModel::replying("Summary.")),
        MockEmbedder::default(),
        StubEntityAnalyzer::default(),
        Arc::clone(&store),
        None,
    );

    pipeline.run(2, None, 42).await.unwrap();
    let first_a1 = store.record("a1").unwrap();
    let first_a2 = store.record("a2").unwrap();

    let report = pipeline.run(2, None, 42).await.unwrap();
    assert_eq!(report.stored, 2);
    assert_eq!(store.stored_ids(), vec!["a1", "a2"]);
    assert_eq!(store.record("a1").unwrap(), first_a1);
    assert_eq!(store.record("a2").unwrap(), first_a2);
}
