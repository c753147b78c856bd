//! Core types for the news RAG system

pub mod article;
pub mod context;

pub use article::{ApiEntity, ArticleRecord, ArticleRow, EntityMention, StructuredExtraction};
pub use context::{SourceContext, NO_KEY_INFO_TEXT, NO_SUMMARY_TEXT};
