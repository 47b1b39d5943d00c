//! Deterministic stand-ins for the hosted embedding and completion APIs

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use docqa_core::{
    Document, EmbeddingProvider, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
    SearchConfig, SearchResult, VectorStore,
};

use crate::LocalVectorStore;

const VOCABULARY: &[&str] = &[
    "rust", "python", "code", "cats", "dogs", "sleep", "paris", "france", "berlin", "germany",
    "capital", "river",
];

/// Bag-of-words embedder over a fixed vocabulary
pub struct KeywordEmbedder {
    document_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            document_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }
    }

    pub fn embed(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        VOCABULARY
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f32)
            .collect()
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::embed(text))
    }

    fn model_id(&self) -> &str {
        "keyword-test"
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

/// Embedder that always fails, as if the API were unreachable
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Network("connection refused".to_string()))
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Network("connection refused".to_string()))
    }

    fn model_id(&self) -> &str {
        "failing-test"
    }
}

/// LLM that records every prompt and replies with a canned answer or error
pub struct RecordingLLM {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<(String, GenerationConfig)>>,
}

impl RecordingLLM {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(String, GenerationConfig)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for RecordingLLM {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.model_id().to_string(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), config.clone()));
        match &self.reply {
            Ok(text) => Ok(GenerationResult {
                text: text.clone(),
                model_id: config.model_id.clone(),
                tokens_used: None,
            }),
            Err(message) => Err(Error::LLMProvider(message.clone())),
        }
    }

    fn model_id(&self) -> &str {
        "recording-test"
    }
}

/// Local store whose `delete_collection` always fails
pub struct StickyStore {
    inner: LocalVectorStore<KeywordEmbedder>,
    delete_calls: AtomicUsize,
}

impl StickyStore {
    pub fn new(embedder: Arc<KeywordEmbedder>) -> Self {
        Self {
            inner: LocalVectorStore::new(embedder),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for StickyStore {
    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>> {
        self.inner.add_documents(documents).await
    }

    async fn similarity_search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        self.inner.similarity_search(query, config).await
    }

    async fn similarity_search_by_vector(
        &self,
        vector: &[f32],
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        self.inner.similarity_search_by_vector(vector, config).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }

    async fn delete_collection(&self) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::VectorStore("collection is locked".to_string()))
    }

    fn collection_name(&self) -> &str {
        self.inner.collection_name()
    }
}
