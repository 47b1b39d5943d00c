//! In-memory, request-scoped vector store

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use docqa_core::{
    Document, EmbeddingProvider, Error, Result, SearchConfig, SearchResult, VectorDocument,
    VectorStore,
};

struct Collection {
    documents: Vec<VectorDocument>,
    dimension: Option<usize>,
}

/// Local in-memory vector store holding a single named collection
///
/// The store embeds documents with its `EmbeddingProvider` on insert and
/// ranks by cosine similarity. After `delete_collection` every operation
/// returns `Error::VectorStore`.
pub struct LocalVectorStore<E: EmbeddingProvider> {
    name: String,
    embedder: Arc<E>,
    collection: RwLock<Option<Collection>>,
}

impl<E: EmbeddingProvider + 'static> LocalVectorStore<E> {
    /// Create an empty collection with a random name
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            name: format!("docqa-{}", Uuid::new_v4()),
            embedder,
            collection: RwLock::new(Some(Collection {
                documents: Vec::new(),
                dimension: None,
            })),
        }
    }

    /// Create a collection and fill it with `documents`
    pub async fn from_documents(documents: Vec<Document>, embedder: Arc<E>) -> Result<Self> {
        let store = Self::new(embedder);
        store.add_documents(documents).await?;
        Ok(store)
    }

    /// Cosine similarity; zero-norm vectors score 0
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    fn deleted(&self) -> Error {
        Error::VectorStore(format!("collection {} has been deleted", self.name))
    }
}

#[async_trait]
impl<E: EmbeddingProvider + 'static> VectorStore for LocalVectorStore<E> {
    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;

        if embeddings.len() != documents.len() {
            return Err(Error::VectorStore(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let mut guard = self
            .collection
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        let collection = guard.as_mut().ok_or_else(|| self.deleted())?;

        let mut dimension = collection.dimension;
        for embedding in &embeddings {
            match dimension {
                Some(dim) if dim != embedding.len() => {
                    return Err(Error::VectorStore(format!(
                        "embedding dimension {} does not match collection dimension {}",
                        embedding.len(),
                        dim
                    )));
                }
                Some(_) => {}
                None => dimension = Some(embedding.len()),
            }
        }
        collection.dimension = dimension;

        let mut ids = Vec::with_capacity(documents.len());
        for (document, embedding) in documents.into_iter().zip(embeddings) {
            let id = Uuid::new_v4().to_string();
            collection.documents.push(VectorDocument {
                id: id.clone(),
                content: document.page_content,
                embedding,
                metadata: document.metadata,
                score: None,
            });
            ids.push(id);
        }

        Ok(ids)
    }

    async fn similarity_search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        let vector = self.embedder.embed_query(query).await?;
        self.similarity_search_by_vector(&vector, config).await
    }

    async fn similarity_search_by_vector(
        &self,
        vector: &[f32],
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        let guard = self
            .collection
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        let collection = guard.as_ref().ok_or_else(|| self.deleted())?;

        if let Some(dim) = collection.dimension {
            if dim != vector.len() {
                return Err(Error::VectorStore(format!(
                    "query dimension {} does not match collection dimension {}",
                    vector.len(),
                    dim
                )));
            }
        }

        let mut results: Vec<VectorDocument> = collection
            .documents
            .iter()
            .map(|doc| {
                let mut scored = doc.clone();
                scored.score = Some(Self::cosine_similarity(vector, &doc.embedding));
                scored
            })
            .filter(|doc| match config.score_threshold {
                Some(threshold) => doc.score.unwrap_or(0.0) >= threshold,
                None => true,
            })
            .collect();

        // Stable sort: ties keep insertion order.
        results.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .partial_cmp(&a.score.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        });

        results.truncate(config.top_k);

        let total = results.len();

        Ok(SearchResult {
            documents: results,
            total,
        })
    }

    async fn count(&self) -> Result<usize> {
        let guard = self
            .collection
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        guard
            .as_ref()
            .map(|collection| collection.documents.len())
            .ok_or_else(|| self.deleted())
    }

    async fn delete_collection(&self) -> Result<()> {
        let mut guard = self
            .collection
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        match guard.take() {
            Some(_) => {
                log::debug!("deleted collection {}", self.name);
                Ok(())
            }
            None => Err(self.deleted()),
        }
    }

    fn collection_name(&self) -> &str {
        &self.name
    }
}
