//! Document and chunk types

use serde::{Deserialize, Serialize};

/// A piece of text plus free-form metadata, the unit handed to vector stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    pub metadata: serde_json::Value,
}

impl Document {
    /// Create a document with empty metadata
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: serde_json::Value::Object(Default::default()),
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A window of the source text
///
/// `offset` is the index, in characters, of the first character of `text`
/// within the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub offset: usize,
}

/// Configuration for document splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}
