//! OpenAI client implementation

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use docqa_core::{
    EmbeddingProvider, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
};

use crate::config::OpenAiConfig;

/// Client for the OpenAI `/completions` and `/embeddings` endpoints
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
    completions_url: String,
    embeddings_url: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let base = config.api_base.trim_end_matches('/');
        let completions_url = format!("{}/completions", base);
        let embeddings_url = format!("{}/embeddings", base);

        Ok(Self {
            config,
            client,
            completions_url,
            embeddings_url,
        })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn bearer(&self) -> Result<String> {
        match self.config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(format!("Bearer {}", key)),
            _ => Err(Error::Authentication(
                "OPENAI_API_KEY is not set; export it or add it to .env".to_string(),
            )),
        }
    }

    /// POST a JSON body and decode a JSON reply, mapping non-2xx statuses via `on_status`
    async fn post_json<B, R>(&self, url: &str, body: &B, on_status: fn(String) -> Error) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let bearer = self.bearer()?;

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, bearer)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            let message = format!("OpenAI request failed with status {}: {}", status, error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(message),
                _ => on_status(message),
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: inputs,
        };

        let mut parsed: EmbeddingResponse = self
            .post_json(&self.embeddings_url, &request, Error::Embedding)
            .await?;

        if parsed.data.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                parsed.data.len(),
                inputs.len()
            )));
        }

        parsed.data.sort_by_key(|entry| entry.index);
        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[async_trait]
impl LLMProvider for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.config.completion_model.clone(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request = CompletionRequest {
            model: &config.model_id,
            prompt,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            stop: &config.stop_sequences,
        };

        log::debug!(
            "requesting completion from {} ({} prompt chars)",
            config.model_id,
            prompt.chars().count()
        );

        let parsed: CompletionResponse = self
            .post_json(&self.completions_url, &request, Error::LLMProvider)
            .await?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .ok_or_else(|| Error::LLMProvider("OpenAI returned no choices".to_string()))?;

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
            tokens_used: parsed.usage.map(|usage| usage.total_tokens),
        })
    }

    fn model_id(&self) -> &str {
        &self.config.completion_model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.config.embedding_batch_size.max(1);
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
        }

        log::debug!(
            "embedded {} texts with {}",
            vectors.len(),
            self.config.embedding_model
        );
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("OpenAI returned no embedding".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}
