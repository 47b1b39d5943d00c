//! OpenAI configuration

use serde::{Deserialize, Serialize};
use std::env;

use docqa_core::{Error, Result, DEFAULT_COMPLETION_MODEL, DEFAULT_EMBEDDING_MODEL};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Inputs per `/embeddings` request
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 1000;

/// Configuration for the OpenAI client
///
/// The API key may be absent; the client reports it when a request is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub completion_model: String,
    pub embedding_model: String,
    pub embedding_batch_size: usize,
    pub timeout_secs: Option<u64>,
}

impl OpenAiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());

        let api_base = lookup("OPENAI_API_BASE").unwrap_or(defaults.api_base);

        let completion_model =
            lookup("DOCQA_COMPLETION_MODEL").unwrap_or(defaults.completion_model);

        let embedding_model = lookup("DOCQA_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model);

        let timeout_secs = match lookup("DOCQA_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::Configuration(format!(
                    "DOCQA_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?),
            None => None,
        };

        Ok(Self {
            api_key,
            api_base,
            completion_model,
            embedding_model,
            embedding_batch_size: defaults.embedding_batch_size,
            timeout_secs,
        })
    }

    /// Create configuration with an explicit key and default endpoints
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Point the client at a different OpenAI-compatible base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            timeout_secs: None,
        }
    }
}
