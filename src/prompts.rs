//! Prompt templates for synthesis, extraction, and summarization

use crate::types::SourceContext;

/// Prompt builder for the news pipelines
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved sources as delimited blocks, in retrieval order.
    ///
    /// The block markers and field labels are part of the synthesis content
    /// contract; the model cites `Source ID` values back in its answer.
    pub fn build_source_blocks(sources: &[SourceContext]) -> String {
        let mut blocks = String::new();
        for (i, source) in sources.iter().enumerate() {
            blocks.push_str(&format!("--- Start of Source {} ---\n", i + 1));
            blocks.push_str(&format!("Source ID: {}\n", source.id));
            blocks.push_str(&format!("Summary: {}\n", source.summary));
            blocks.push_str(&format!("Key Information Extracted: {}\n", source.key_info));
            blocks.push_str(&format!("--- End of Source {} ---\n\n", i + 1));
        }
        blocks
    }

    /// Build the grounded synthesis prompt for the agent
    pub fn build_synthesis_prompt(query: &str, sources: &[SourceContext]) -> String {
        format!(
            r#"You are an expert News Analyst. Your task is to provide a clear, factual, and synthesized answer to the user's question.
Base your answer *exclusively* on the provided news article sources.
Do not use any external knowledge.
When you use information from a source, cite it at the end of the sentence using its ID (e.g., [document-id-123]).
If the sources do not contain enough information to answer the question, state that clearly.

**User's Question:**
{query}

**Provided Sources:**
{context}

**Synthesized News Report:**
"#,
            query = query,
            context = Self::build_source_blocks(sources),
        )
    }

    /// Build the structured-extraction prompt (JSON response mode)
    pub fn build_extraction_prompt(text: &str) -> String {
        format!(
            r#"**Instruction:**
From the news article provided below, extract the key information.

**JSON Schema to follow:**
- "main_event_or_topic": A concise string describing the central event or subject of the article.
- "key_people": A list of key individuals mentioned.
- "key_organizations": A list of key organizations, companies, or government bodies.
- "key_locations": A list of key locations mentioned.
- "dates_and_times": A list of specific dates or timeframes mentioned.
- "quantitative_information": A list of important numbers, figures, or statistics (e.g., money, percentages, counts).
- "outcome_or_impact": A brief string describing the result, consequence, or impact of the main event.

**Article:**
{text}
"#,
            text = text,
        )
    }

    /// Build the one-sentence summarization prompt
    pub fn build_summary_prompt(text: &str) -> String {
        format!(
            r#"**Instruction:**
Your task is to write a single, high-quality sentence that summarizes the main point of the news article provided. The sentence should be written as if it were the first sentence of the article itself.

**Constraints:**
- The summary MUST be a single, complete sentence.
- It must be written in the third person.
- It must be highly factual and grounded in the provided text.
- Do not use introductory phrases like "This article discusses..." or "The document is about...".

**Article:**
{text}

**One-Sentence Summary:**
"#,
            text = text,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<SourceContext> {
        vec![
            SourceContext {
                id: "a1".to_string(),
                summary: "A hospital opened a new ward.".to_string(),
                key_info: "Main topic: Hospital expansion".to_string(),
            },
            SourceContext {
                id: "a2".to_string(),
                summary: "Funding was approved in March.".to_string(),
                key_info: "Dates: March".to_string(),
            },
        ]
    }

    #[test]
    fn source_blocks_are_delimited_and_ordered() {
        let blocks = PromptBuilder::build_source_blocks(&sources());
        assert!(blocks.contains("--- Start of Source 1 ---"));
        assert!(blocks.contains("Source ID: a1"));
        assert!(blocks.contains("--- End of Source 1 ---"));
        assert!(blocks.contains("--- Start of Source 2 ---"));
        assert!(blocks.contains("Source ID: a2"));
        let first = blocks.find("Source ID: a1").unwrap();
        let second = blocks.find("Source ID: a2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn synthesis_prompt_embeds_query_and_sources() {
        let prompt = PromptBuilder::build_synthesis_prompt("What opened in the city?", &sources());
        assert!(prompt.contains("What opened in the city?"));
        assert!(prompt.contains("A hospital opened a new ward."));
        assert!(prompt.contains("Funding was approved in March."));
        assert!(prompt.contains("**Provided Sources:**"));
        assert!(prompt.contains("**Synthesized News Report:**"));
    }

    #[test]
    fn extraction_prompt_lists_all_schema_keys() {
        let prompt = PromptBuilder::build_extraction_prompt("Some article.");
        for key in [
            "main_event_or_topic",
            "key_people",
            "key_organizations",
            "key_locations",
            "dates_and_times",
            "quantitative_information",
            "outcome_or_impact",
        ] {
            assert!(prompt.contains(key), "missing schema key {}", key);
        }
        assert!(prompt.contains("Some article."));
    }
}
