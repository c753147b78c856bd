//! Entity analysis via the Cloud Natural Language API

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::auth::GcpAuth;
use crate::error::{Error, Result};
use crate::providers::entities::EntityAnalyzer;
use crate::types::ApiEntity;

const ANALYZE_ENTITIES_URL: &str = "https://language.googleapis.com/v1/documents:analyzeEntities";

/// Natural Language API entity analyzer
pub struct LanguageApiAnalyzer {
    auth: GcpAuth,
}

impl LanguageApiAnalyzer {
    pub fn new(auth: GcpAuth) -> Self {
        Self { auth }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    document: AnalyzeDocument,
    encoding_type: &'static str,
}

#[derive(Serialize)]
struct AnalyzeDocument {
    #[serde(rename = "type")]
    doc_type: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    entities: Vec<AnalyzedEntity>,
}

#[derive(Deserialize)]
struct AnalyzedEntity {
    name: String,
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default)]
    salience: f64,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[async_trait]
impl EntityAnalyzer for LanguageApiAnalyzer {
    async fn analyze_entities(&self, text: &str) -> Result<Vec<ApiEntity>> {
        let client = self.auth.authorized_client().await?;

        let request = AnalyzeRequest {
            document: AnalyzeDocument {
                doc_type: "PLAIN_TEXT",
                content: text.to_string(),
            },
            encoding_type: "UTF8",
        };

        let response = client
            .post(ANALYZE_ENTITIES_URL)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::EntityAnalysis(format!("NL API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::EntityAnalysis(format!(
                "NL API analysis failed ({}): {}",
                status, body
            )));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| Error::EntityAnalysis(format!("Failed to parse NL API response: {}", e)))?;

        let entities = parsed
            .entities
            .into_iter()
            .map(|mut e| ApiEntity {
                name: e.name,
                entity_type: e.entity_type,
                salience: e.salience,
                wikipedia_url: e.metadata.remove("wikipedia_url"),
            })
            .collect();

        Ok(entities)
    }

    fn name(&self) -> &str {
        "nl-api"
    }
}
