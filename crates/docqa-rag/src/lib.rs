//! Retrieval-augmented question answering for docqa
//!
//! This crate provides the text splitter, the in-memory vector store, the
//! retriever, the "stuff" QA chain and the request-scoped engine that ties
//! them together.

mod chain;
mod engine;
mod retriever;
mod splitter;
mod vector_store;

#[cfg(test)]
mod testing;

pub use chain::{RetrievalQA, DOCUMENT_SEPARATOR};
pub use engine::EphemeralRAGEngine;
pub use retriever::VectorStoreRetriever;
pub use splitter::{CharacterTextSplitter, CHUNK_OVERLAP, CHUNK_SIZE};
pub use vector_store::LocalVectorStore;

// Re-export core types for convenience
pub use docqa_core::{
    Chunk, ChunkingConfig, Document, EmbeddingProvider, Error, LLMProvider, RAGEngine, RAGQuery,
    RAGResult, Result, SearchConfig, SearchResult, VectorDocument, VectorStore,
};
