//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Default hosted completion model
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationConfig {
    /// Deterministic sampling, matching the answer generator's needs.
    fn default() -> Self {
        Self {
            model_id: DEFAULT_COMPLETION_MODEL.to_string(),
            max_tokens: 256,
            temperature: 0.0,
            stop_sequences: Vec::new(),
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for hosted LLM providers
///
/// Implementations send a single prompt and return the completion text.
/// There is no retry or streaming at this layer.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text using the provider's default configuration
    async fn generate(&self, prompt: &str) -> Result<GenerationResult>;

    /// Generate text with custom configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
