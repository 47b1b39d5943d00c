//! OpenAI integration for docqa
//!
//! This crate provides the OpenAI implementation of the `LLMProvider` and
//! `EmbeddingProvider` traits.

mod client;
mod config;


pub use client::OpenAiClient;
pub use config::{OpenAiConfig, DEFAULT_API_BASE, DEFAULT_EMBEDDING_BATCH_SIZE};

// Re-export core types for convenience
pub use docqa_core::{
    EmbeddingProvider, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
};
