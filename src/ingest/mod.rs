//! Offline ingestion: sampling, enrichment and persistence.

pub mod pipeline;
pub mod source;

pub use pipeline::{IngestPipeline, IngestReport};
pub use source::{ArticleSource, GcsArticleSource};
