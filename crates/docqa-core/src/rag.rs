//! RAG (Retrieval-Augmented Generation) engine trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Document, Result};

/// A question asked about a block of text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGQuery {
    pub content: String,
    pub query: String,
}

impl RAGQuery {
    pub fn new(content: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            query: query.into(),
        }
    }
}

/// Answer produced by a RAG engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGResult {
    pub answer: String,
    pub source_documents: Vec<Document>,
    pub metadata: Option<serde_json::Value>,
}

/// Trait for RAG engines
///
/// An engine owns the whole index-retrieve-generate pass for one query.
/// Nothing it builds is expected to outlive the call.
#[async_trait]
pub trait RAGEngine: Send + Sync {
    /// Index `query.content` and answer `query.query` against it
    async fn answer(&self, query: &RAGQuery) -> Result<RAGResult>;
}
