//! Core traits and types for docqa
//!
//! This crate defines the fundamental traits and types used across the docqa system.
//! It provides capability-facing interfaces for LLM providers, embedding providers,
//! vector stores and RAG engines, so every stage can be swapped for a test double.

pub mod document;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod vector_store;

pub use document::{Chunk, ChunkingConfig, Document};
pub use embedding::{EmbeddingProvider, DEFAULT_EMBEDDING_MODEL};
pub use error::{Error, Result};
pub use llm::{GenerationConfig, GenerationResult, LLMProvider, DEFAULT_COMPLETION_MODEL};
pub use rag::{RAGEngine, RAGQuery, RAGResult};
pub use vector_store::{SearchConfig, SearchResult, VectorDocument, VectorStore, DEFAULT_TOP_K};
