//! Fixed-window character splitter

use serde_json::json;

use docqa_core::{Chunk, ChunkingConfig, Document, Error, Result};

/// Window length, in characters
pub const CHUNK_SIZE: usize = 500;

/// Characters shared by consecutive windows
pub const CHUNK_OVERLAP: usize = 100;

/// Splits text into overlapping windows of `chunk_size` characters
///
/// Each window starts `chunk_size - chunk_overlap` characters after the
/// previous one; the last window ends exactly at the end of the text.
#[derive(Debug, Clone, Copy)]
pub struct CharacterTextSplitter {
    config: ChunkingConfig,
}

impl CharacterTextSplitter {
    /// Splitter with the fixed 500/100 window
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig {
                chunk_size: CHUNK_SIZE,
                chunk_overlap: CHUNK_OVERLAP,
            },
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: ChunkingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(Error::InvalidInput("chunk size must be positive".to_string()));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(Error::InvalidInput(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(Self { config })
    }

    /// Split text into ordered windows
    ///
    /// Text no longer than one window (including empty text) yields a single chunk.
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.config.chunk_size).min(chars.len());
            chunks.push(Chunk {
                text: chars[start..end].iter().collect(),
                offset: start,
            });

            if end >= chars.len() {
                break;
            }

            start = end - self.config.chunk_overlap;
        }

        chunks
    }

    /// Split each document, copying its metadata onto every chunk
    ///
    /// Adds `offset` and `chunk_index` to each chunk's metadata.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let mut out = Vec::new();

        for document in documents {
            for (index, chunk) in self.split_text(&document.page_content).into_iter().enumerate() {
                let mut metadata = if document.metadata.is_object() {
                    document.metadata.clone()
                } else {
                    json!({})
                };
                metadata["offset"] = json!(chunk.offset);
                metadata["chunk_index"] = json!(index);

                out.push(Document {
                    page_content: chunk.text,
                    metadata,
                });
            }
        }

        out
    }
}

impl Default for CharacterTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}
