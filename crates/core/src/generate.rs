//! TextGenerator trait — the abstraction over generative-language backends.
//!
//! A generator accepts one assembled prompt string and returns one
//! generated string, or a classified failure. Retries happen inside the
//! implementation; the caller only ever sees the final outcome.

use crate::error::GenerateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Returned when a response parses but carries no candidate text.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

/// A model advertised by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Resource name (e.g. "models/gemini-2.5-flash")
    pub name: String,

    /// Human-readable name
    #[serde(default)]
    pub display_name: String,
}

/// An image produced by the backend, decoded to raw bytes.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// The core generation trait.
///
/// Backends implement `generate`; image synthesis and model listing are
/// optional capabilities with conservative defaults.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// A human-readable name for this backend (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate text from one assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Generate an image from a prompt.
    ///
    /// Default implementation reports the capability as unavailable.
    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, GenerateError> {
        Err(GenerateError::NotConfigured(format!(
            "Generator '{}' does not support image synthesis",
            self.name()
        )))
    }

    /// List models available on this backend.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerateError> {
        Ok(Vec::new())
    }
}
