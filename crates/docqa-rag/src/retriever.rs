//! Retriever over a vector store

use std::sync::Arc;

use docqa_core::{Document, Result, SearchConfig, VectorStore};

/// Returns the top-k documents of a store for a query
pub struct VectorStoreRetriever<V: VectorStore> {
    store: Arc<V>,
    search_config: SearchConfig,
}

impl<V: VectorStore> VectorStoreRetriever<V> {
    /// Retriever with the default `k`
    pub fn new(store: Arc<V>) -> Self {
        Self {
            store,
            search_config: SearchConfig::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.search_config.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.search_config.top_k
    }

    pub async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>> {
        let result = self
            .store
            .similarity_search(query, &self.search_config)
            .await?;

        log::debug!(
            "retrieved {} of top {} chunks from {}",
            result.total,
            self.search_config.top_k,
            self.store.collection_name()
        );

        Ok(result
            .documents
            .into_iter()
            .map(|doc| doc.into_document())
            .collect())
    }
}
