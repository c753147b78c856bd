//! Gemini client via the Vertex AI `:generateContent` endpoint
//!
//! Serves both free-form generation (summaries, synthesized answers) and
//! JSON-constrained generation (structured event extraction).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::auth::GcpAuth;
use crate::error::{Error, Result};
use crate::providers::generative::GenerativeModel;

const JSON_MIME_TYPE: &str = "application/json";

/// Low temperature keeps summaries and reports grounded in the sources
const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Gemini generative model client
pub struct GeminiModel {
    auth: GcpAuth,
    location: String,
    model: String,
}

impl GeminiModel {
    /// Create a client for the given region and model
    pub fn new(auth: GcpAuth, location: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            auth,
            location: location.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{proj}/locations/{loc}/publishers/google/models/{model}:generateContent",
            loc = self.location,
            proj = self.auth.project_id(),
            model = self.model,
        )
    }

    async fn request(&self, prompt: &str, response_mime_type: Option<&str>) -> Result<String> {
        let client = self.auth.authorized_client().await?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: response_mime_type.map(str::to_string),
            },
        };

        let response = client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Failed to parse Gemini response: {}", e)))?;

        // A candidate can split its text across parts
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Generation("No text in Gemini response".to_string()));
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.request(prompt, None).await
    }

    async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.request(prompt, Some(JSON_MIME_TYPE)).await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
