//! Google generative-language backend.
//!
//! Implements `TextGenerator` against the `generateContent` endpoint, with
//! model listing and image synthesis via the `predict` endpoint. Every
//! round trip runs inside the shared retry policy; callers see only the
//! final outcome.

use crate::retry::RetryPolicy;
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use storyloom_core::error::GenerateError;
use storyloom_core::generate::{FALLBACK_REPLY, GeneratedImage, ModelInfo, TextGenerator};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A generative-language API backend.
pub struct GeminiGenerator {
    base_url: String,
    api_key: String,
    model: String,
    image_model: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl GeminiGenerator {
    /// Create a new backend with default models and retry policy.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: "gemini-2.5-flash".into(),
            image_model: "imagen-3.0-generate-002".into(),
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Build a backend from configuration.
    pub fn from_config(config: &storyloom_config::AppConfig) -> Self {
        Self::new(config.api_key.clone().unwrap_or_default())
            .with_base_url(&config.base_url)
            .with_model(&config.model)
            .with_image_model(&config.image_model)
            .with_retry(RetryPolicy::from_config(&config.retry))
    }

    /// Override the base URL (e.g. for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_image_model(mut self, image_model: impl Into<String>) -> Self {
        self.image_model = image_model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One generateContent round trip, no retry.
    async fn generate_once(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let envelope: GenerateContentResponse = classify(response).await?;
        Ok(first_candidate_text(envelope))
    }

    async fn generate_image_once(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        let url = format!(
            "{}/models/{}:predict?key={}",
            self.base_url, self.image_model, self.api_key
        );

        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters { sample_count: 1 },
        };

        debug!(model = %self.image_model, "Sending image request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let envelope: PredictResponse = classify(response).await?;

        let prediction = envelope
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| GenerateError::BadResponse("No image returned from model".into()))?;

        let data = base64::engine::general_purpose::STANDARD
            .decode(&prediction.bytes_base64_encoded)
            .map_err(|e| GenerateError::BadResponse(format!("Invalid image payload: {e}")))?;

        Ok(GeneratedImage {
            mime_type: prediction.mime_type.unwrap_or_else(|| "image/png".into()),
            data,
        })
    }

    async fn list_models_once(&self) -> Result<Vec<ModelInfo>, GenerateError> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let envelope: ListModelsResponse = classify(response).await?;

        Ok(envelope
            .models
            .into_iter()
            .map(|m| ModelInfo {
                name: m.name,
                display_name: m.display_name.unwrap_or_default(),
            })
            .collect())
    }
}

/// Pull the first candidate's text out of a parsed envelope.
///
/// A parsed envelope with no candidate text is not an error; the fixed
/// fallback reply stands in for the missing candidate.
fn first_candidate_text(envelope: GenerateContentResponse) -> String {
    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}

/// Classify a response by status, then parse the success body.
async fn classify<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GenerateError> {
    let status = response.status().as_u16();

    if status == 429 {
        return Err(GenerateError::RateLimited { retry_after_secs: 5 });
    }

    if status == 401 || status == 403 {
        return Err(GenerateError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ));
    }

    if !(200..300).contains(&status) {
        let error_body = response.text().await.unwrap_or_default();
        warn!(status, body = %error_body, "Service returned error");
        return Err(GenerateError::Api {
            status_code: status,
            message: error_body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| GenerateError::BadResponse(format!("Failed to parse response: {e}")))
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.retry.run(|| self.generate_once(prompt)).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        self.retry.run(|| self.generate_image_once(prompt)).await
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerateError> {
        self.retry.run(|| self.list_models_once()).await
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

// --- Image prediction wire types ---

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: String,
    #[serde(default)]
    mime_type: Option<String>,
}

// --- Model listing wire types ---

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "a rainy street".into(),
                }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a rainy street");
    }

    #[test]
    fn response_text_extracted_unchanged() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"The rain kept falling."}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(data).unwrap();
        assert_eq!(first_candidate_text(parsed), "The rain kept falling.");
    }

    #[test]
    fn empty_candidates_yield_fallback_not_error() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(first_candidate_text(parsed), FALLBACK_REPLY);

        // Missing field entirely also parses (serde default)
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_candidate_text(parsed), FALLBACK_REPLY);

        // Candidate present but with no parts
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert_eq!(first_candidate_text(parsed), FALLBACK_REPLY);
    }

    #[test]
    fn prediction_envelope_parses() {
        let data = r#"{"predictions":[{"bytesBase64Encoded":"aGVsbG8=","mimeType":"image/png"}]}"#;
        let parsed: PredictResponse = serde_json::from_str(data).unwrap();
        let prediction = &parsed.predictions[0];
        assert_eq!(prediction.bytes_base64_encoded, "aGVsbG8=");
        assert_eq!(prediction.mime_type.as_deref(), Some("image/png"));
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&prediction.bytes_base64_encoded)
            .unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn list_models_envelope_parses() {
        let data = r#"{"models":[{"name":"models/gemini-2.5-flash","displayName":"Gemini 2.5 Flash"},{"name":"models/older"}]}"#;
        let parsed: ListModelsResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.models.len(), 2);
        assert_eq!(parsed.models[0].name, "models/gemini-2.5-flash");
        assert_eq!(
            parsed.models[0].display_name.as_deref(),
            Some("Gemini 2.5 Flash")
        );
        assert!(parsed.models[1].display_name.is_none());
    }

    #[test]
    fn builder_trims_trailing_slash() {
        let backend = GeminiGenerator::new("k").with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(backend.base_url, "http://localhost:9999/v1beta");
    }

    #[test]
    fn from_config_applies_overrides() {
        let config = storyloom_config::AppConfig {
            api_key: Some("k".into()),
            base_url: "http://localhost:1234".into(),
            model: "gemini-pro".into(),
            image_model: "imagen-x".into(),
            retry: storyloom_config::RetryConfig {
                max_attempts: 2,
                base_delay_ms: 10,
            },
        };
        let backend = GeminiGenerator::from_config(&config);
        assert_eq!(backend.model, "gemini-pro");
        assert_eq!(backend.image_model, "imagen-x");
        assert_eq!(backend.retry.max_attempts, 2);
    }
}
