//! Article records as sampled from the bulk source and as stored after enrichment

use serde::{Deserialize, Serialize};

/// One raw article row from the bulk news dataset.
///
/// `id` is assigned by the dataset and is the key for both the document
/// store and the vector index. `summary` is the ground-truth reference
/// summary shipped with the dataset; it is stored for provenance only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleRow {
    /// Dataset-assigned article id
    pub id: String,
    /// Full article body
    pub document: String,
    /// Ground-truth reference summary
    pub summary: String,
}

impl ArticleRow {
    /// Word count of the article body, used by the sampling length filter
    pub fn word_count(&self) -> usize {
        self.document.split_whitespace().count()
    }
}

/// Fully enriched article as persisted in the document store.
///
/// The store keys records by article id; the record itself carries only the
/// enrichment fields. Writes are full overwrites, so a stored record always
/// reflects one coherent enrichment pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleRecord {
    /// Ground-truth summary from the source dataset (provenance only)
    pub reference_summary: String,
    /// Abstractive one-sentence summary from the generative model
    pub gemini_summary: String,
    /// Extractive summary from the classical sentence-ranking baseline
    pub textrank_summary: String,
    /// Structured event extraction from the generative model (JSON mode)
    pub vertex_ai_extraction: StructuredExtraction,
    /// Entities from the Natural Language API (baseline, not used by the agent)
    pub nl_api_entities: Vec<ApiEntity>,
    /// Entities from the rule-based baseline (not used by the agent)
    pub spacy_entities: Vec<EntityMention>,
    /// Provenance pointer to the raw source blob
    pub gcs_uri: String,
}

/// Fixed-shape structured extraction produced by the generative model.
///
/// All fields default to empty; an all-empty value means extraction failed
/// for that article.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredExtraction {
    /// One-sentence description of the main event or topic
    #[serde(default)]
    pub main_event_or_topic: String,
    /// People central to the story
    #[serde(default)]
    pub key_people: Vec<String>,
    /// Organizations involved
    #[serde(default)]
    pub key_organizations: Vec<String>,
    /// Locations where events took place
    #[serde(default)]
    pub key_locations: Vec<String>,
    /// Dates or times mentioned
    #[serde(default)]
    pub dates_and_times: Vec<String>,
    /// Figures, statistics, or other quantities
    #[serde(default)]
    pub quantitative_information: Vec<String>,
    /// Stated outcome or impact of the event
    #[serde(default)]
    pub outcome_or_impact: String,
}

impl StructuredExtraction {
    /// True when every field is empty (extraction failed or produced nothing)
    pub fn is_empty(&self) -> bool {
        self.main_event_or_topic.is_empty()
            && self.key_people.is_empty()
            && self.key_organizations.is_empty()
            && self.key_locations.is_empty()
            && self.dates_and_times.is_empty()
            && self.quantitative_information.is_empty()
            && self.outcome_or_impact.is_empty()
    }

    /// Render as labeled lines in fixed field order, omitting empty fields.
    ///
    /// This is the key-information text the synthesis prompt embeds, so the
    /// rendering must be deterministic for a given input.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if !self.main_event_or_topic.is_empty() {
            lines.push(format!("Main topic: {}", self.main_event_or_topic));
        }
        if !self.key_people.is_empty() {
            lines.push(format!("Key people: {}", self.key_people.join(", ")));
        }
        if !self.key_organizations.is_empty() {
            lines.push(format!(
                "Key organizations: {}",
                self.key_organizations.join(", ")
            ));
        }
        if !self.key_locations.is_empty() {
            lines.push(format!("Key locations: {}", self.key_locations.join(", ")));
        }
        if !self.dates_and_times.is_empty() {
            lines.push(format!("Dates: {}", self.dates_and_times.join(", ")));
        }
        if !self.quantitative_information.is_empty() {
            lines.push(format!(
                "Quantities: {}",
                self.quantitative_information.join(", ")
            ));
        }
        if !self.outcome_or_impact.is_empty() {
            lines.push(format!("Outcome: {}", self.outcome_or_impact));
        }
        lines.join("\n")
    }
}

/// Entity row from the Natural Language API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEntity {
    /// Surface form of the entity
    pub name: String,
    /// API entity type (PERSON, ORGANIZATION, LOCATION, ...)
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Salience score in [0, 1]
    pub salience: f64,
    /// Wikipedia URL when the API links one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_url: Option<String>,
}

/// Entity row from the rule-based baseline extractor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityMention {
    /// Matched text span
    pub text: String,
    /// Assigned label (PERSON, ORG, PROPN, DATE, CARDINAL, MONEY, PERCENT)
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_skips_empty_fields() {
        let extraction = StructuredExtraction {
            main_event_or_topic: "Factory closure in Wales".to_string(),
            key_people: vec![],
            key_organizations: vec!["Acme Ltd".to_string()],
            key_locations: vec!["Wales".to_string(), "Cardiff".to_string()],
            dates_and_times: vec![],
            quantitative_information: vec!["300 jobs".to_string()],
            outcome_or_impact: String::new(),
        };
        let rendered = extraction.render();
        assert_eq!(
            rendered,
            "Main topic: Factory closure in Wales\n\
             Key organizations: Acme Ltd\n\
             Key locations: Wales, Cardiff\n\
             Quantities: 300 jobs"
        );
    }

    #[test]
    fn render_is_deterministic() {
        let extraction = StructuredExtraction {
            main_event_or_topic: "Election result".to_string(),
            key_people: vec!["A. Candidate".to_string()],
            ..Default::default()
        };
        assert_eq!(extraction.render(), extraction.render());
    }

    #[test]
    fn empty_extraction_reports_empty() {
        assert!(StructuredExtraction::default().is_empty());
        let extraction = StructuredExtraction {
            outcome_or_impact: "minor".to_string(),
            ..Default::default()
        };
        assert!(!extraction.is_empty());
    }

    #[test]
    fn extraction_parses_partial_json() {
        let json = r#"{"main_event_or_topic": "Storm damage", "key_locations": ["Orkney"]}"#;
        let extraction: StructuredExtraction = serde_json::from_str(json).unwrap();
        assert_eq!(extraction.main_event_or_topic, "Storm damage");
        assert_eq!(extraction.key_locations, vec!["Orkney"]);
        assert!(extraction.key_people.is_empty());
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        let row = ArticleRow {
            id: "1".to_string(),
            document: "one two\tthree\n four".to_string(),
            summary: String::new(),
        };
        assert_eq!(row.word_count(), 4);
    }
}
