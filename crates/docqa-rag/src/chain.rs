//! Retrieval QA with the "stuff" strategy
//!
//! Every retrieved chunk is concatenated into one context block and sent to
//! the model in a single prompt. No map-reduce, no re-ranking.

use std::sync::Arc;

use docqa_core::{Document, GenerationConfig, LLMProvider, Result, VectorStore};

use crate::retriever::VectorStoreRetriever;

/// Separator between chunks in the stuffed context
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

const PROMPT_PREAMBLE: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Answers a question from retrieved chunks with one LLM call
pub struct RetrievalQA<L: LLMProvider, V: VectorStore> {
    llm: Arc<L>,
    retriever: VectorStoreRetriever<V>,
    generation: GenerationConfig,
}

impl<L: LLMProvider, V: VectorStore> RetrievalQA<L, V> {
    /// Chain with deterministic sampling on the LLM's own model
    pub fn from_llm(llm: Arc<L>, retriever: VectorStoreRetriever<V>) -> Self {
        let generation = GenerationConfig {
            model_id: llm.model_id().to_string(),
            temperature: 0.0,
            ..Default::default()
        };
        Self {
            llm,
            retriever,
            generation,
        }
    }

    /// Join chunk texts into the context block
    pub fn build_context(documents: &[Document]) -> String {
        documents
            .iter()
            .map(|doc| doc.page_content.as_str())
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR)
    }

    pub fn build_prompt(context: &str, question: &str) -> String {
        format!(
            "{}\n\n{}\n\nQuestion: {}\nHelpful Answer:",
            PROMPT_PREAMBLE, context, question
        )
    }

    /// Answer `question`, returning the answer and the chunks it was built from
    pub async fn call(&self, question: &str) -> Result<(String, Vec<Document>)> {
        let documents = self.retriever.get_relevant_documents(question).await?;
        let context = Self::build_context(&documents);
        let prompt = Self::build_prompt(&context, question);

        let result = self
            .llm
            .generate_with_config(&prompt, &self.generation)
            .await?;

        Ok((result.text, documents))
    }

    /// Answer `question`
    pub async fn run(&self, question: &str) -> Result<String> {
        let (answer, _) = self.call(question).await?;
        Ok(answer)
    }
}
