//! Structured-extraction reply parsing
//!
//! Generative models asked for JSON still wrap replies in markdown fences
//! often enough that the payload has to be dug out before deserializing.

use regex::Regex;

use crate::error::{Error, Result};
use crate::types::StructuredExtraction;

const FENCE_PATTERN: &str = r"(?s)```(?:json)?\s*(\{.*?\})\s*```";

/// Parses generative-model replies into [`StructuredExtraction`] records.
pub struct ExtractionParser {
    fence: Regex,
}

impl Default for ExtractionParser {
    fn default() -> Self {
        Self {
            fence: Regex::new(FENCE_PATTERN).expect("Invalid regex"),
        }
    }
}

impl ExtractionParser {
    /// Parse a model reply, stripping a markdown code fence when present.
    ///
    /// Unknown keys in the payload are ignored; missing keys default to
    /// empty so schema drift degrades instead of failing the row.
    pub fn parse(&self, raw: &str) -> Result<StructuredExtraction> {
        let trimmed = raw.trim();
        let payload = self
            .fence
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(trimmed);

        serde_json::from_str(payload)
            .map_err(|e| Error::generation(format!("Malformed extraction reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let parser = ExtractionParser::default();
        let parsed = parser
            .parse(r#"{"main_event_or_topic": "Ferry link restored", "key_people": ["Ann Gloag"]}"#)
            .unwrap();
        assert_eq!(parsed.main_event_or_topic, "Ferry link restored");
        assert_eq!(parsed.key_people, vec!["Ann Gloag"]);
        assert!(parsed.key_locations.is_empty());
    }

    #[test]
    fn strips_markdown_fences() {
        let parser = ExtractionParser::default();
        let raw = "```json\n{\"main_event_or_topic\": \"Bridge closure\",\n \"key_locations\": [\"Forth Road Bridge\"]}\n```";
        let parsed = parser.parse(raw).unwrap();
        assert_eq!(parsed.main_event_or_topic, "Bridge closure");
        assert_eq!(parsed.key_locations, vec!["Forth Road Bridge"]);
    }

    #[test]
    fn strips_untagged_fences_with_surrounding_prose() {
        let parser = ExtractionParser::default();
        let raw = "Here is the extraction:\n```\n{\"outcome_or_impact\": \"Route reopened\"}\n```\nLet me know if you need more.";
        let parsed = parser.parse(raw).unwrap();
        assert_eq!(parsed.outcome_or_impact, "Route reopened");
    }

    #[test]
    fn ignores_unknown_keys() {
        let parser = ExtractionParser::default();
        let parsed = parser
            .parse(r#"{"main_event_or_topic": "Storm damage", "sentiment": "negative"}"#)
            .unwrap();
        assert_eq!(parsed.main_event_or_topic, "Storm damage");
    }

    #[test]
    fn rejects_non_json_replies() {
        let parser = ExtractionParser::default();
        assert!(parser.parse("I could not produce an extraction.").is_err());
    }
}
