//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Default hosted embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Trait for text-to-vector providers
///
/// `embed_documents` must return exactly one vector per input, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of document texts
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding model ID being used
    fn model_id(&self) -> &str;
}
