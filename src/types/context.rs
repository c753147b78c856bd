//! Query-scoped context assembled from retrieved article records

use serde::{Deserialize, Serialize};

use super::article::ArticleRecord;

/// Shown in place of a missing or empty stored summary
pub const NO_SUMMARY_TEXT: &str = "No summary available.";
/// Shown in place of a failed or empty structured extraction
pub const NO_KEY_INFO_TEXT: &str = "No key information extracted.";

/// One source entry handed to the synthesizer.
///
/// Order across entries mirrors retrieval rank; the bundle lives for a
/// single query and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceContext {
    /// Article id, used for inline citations
    pub id: String,
    /// Abstractive summary text
    pub summary: String,
    /// String-rendered structured extraction
    pub key_info: String,
}

impl SourceContext {
    /// Project a stored record down to the fields the synthesizer needs,
    /// substituting fixed fallback text for empty fields.
    pub fn from_record(id: impl Into<String>, record: &ArticleRecord) -> Self {
        let summary = if record.gemini_summary.is_empty() {
            NO_SUMMARY_TEXT.to_string()
        } else {
            record.gemini_summary.clone()
        };
        let key_info = if record.vertex_ai_extraction.is_empty() {
            NO_KEY_INFO_TEXT.to_string()
        } else {
            record.vertex_ai_extraction.render()
        };
        Self {
            id: id.into(),
            summary,
            key_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::article::StructuredExtraction;

    #[test]
    fn empty_fields_get_fallback_text() {
        let record = ArticleRecord::default();
        let ctx = SourceContext::from_record("a1", &record);
        assert_eq!(ctx.id, "a1");
        assert_eq!(ctx.summary, NO_SUMMARY_TEXT);
        assert_eq!(ctx.key_info, NO_KEY_INFO_TEXT);
    }

    #[test]
    fn populated_fields_pass_through() {
        let record = ArticleRecord {
            gemini_summary: "A bridge reopened after repairs.".to_string(),
            vertex_ai_extraction: StructuredExtraction {
                main_event_or_topic: "Bridge reopening".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = SourceContext::from_record("a2", &record);
        assert_eq!(ctx.summary, "A bridge reopened after repairs.");
        assert_eq!(ctx.key_info, "Main topic: Bridge reopening");
    }
}
