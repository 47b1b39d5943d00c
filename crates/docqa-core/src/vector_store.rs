//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Document, Result};

/// Number of documents a retriever returns unless told otherwise
pub const DEFAULT_TOP_K: usize = 4;

/// A document stored in the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
    pub score: Option<f32>,
}

impl VectorDocument {
    /// Convert back into a plain document, dropping the vector and score
    pub fn into_document(self) -> Document {
        Document {
            page_content: self.content,
            metadata: self.metadata,
        }
    }
}

/// Search result from vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub documents: Vec<VectorDocument>,
    pub total: usize,
}

/// Configuration for vector search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    pub score_threshold: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            score_threshold: None,
        }
    }
}

/// Trait for vector stores that embed their own documents
///
/// A store is a single named collection. Once `delete_collection` has run,
/// every other operation fails.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and store documents, returning their ids in input order
    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>>;

    /// Embed `query` and search for similar documents
    async fn similarity_search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult>;

    /// Search using a precomputed vector
    async fn similarity_search_by_vector(
        &self,
        vector: &[f32],
        config: &SearchConfig,
    ) -> Result<SearchResult>;

    /// Get the total number of documents
    async fn count(&self) -> Result<usize>;

    /// Drop the collection and everything in it
    async fn delete_collection(&self) -> Result<()>;

    /// Name of the backing collection
    fn collection_name(&self) -> &str;
}
