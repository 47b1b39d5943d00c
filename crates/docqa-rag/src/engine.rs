//! Request-scoped RAG engine

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use docqa_core::{
    Document, EmbeddingProvider, LLMProvider, RAGEngine, RAGQuery, RAGResult, Result, VectorStore,
    DEFAULT_TOP_K,
};

use crate::chain::RetrievalQA;
use crate::retriever::VectorStoreRetriever;
use crate::splitter::CharacterTextSplitter;
use crate::vector_store::LocalVectorStore;

/// Creates the empty per-request collection
type StoreFactory<E, V> = Arc<dyn Fn(Arc<E>) -> Arc<V> + Send + Sync>;

/// Builds a fresh collection for every query and deletes it afterwards
///
/// One `answer` call runs split, embed, index, retrieve, generate and
/// delete in order. Any failure aborts the rest, including the delete;
/// the collection is then simply dropped with the call.
pub struct EphemeralRAGEngine<L, E, V = LocalVectorStore<E>>
where
    L: LLMProvider,
    E: EmbeddingProvider + 'static,
    V: VectorStore,
{
    llm: Arc<L>,
    embedder: Arc<E>,
    make_store: StoreFactory<E, V>,
    splitter: CharacterTextSplitter,
    top_k: usize,
}

impl<L: LLMProvider, E: EmbeddingProvider + 'static> EphemeralRAGEngine<L, E> {
    /// Engine backed by a `LocalVectorStore` per request
    pub fn new(llm: Arc<L>, embedder: Arc<E>) -> Self {
        Self {
            llm,
            embedder,
            make_store: Arc::new(|embedder: Arc<E>| Arc::new(LocalVectorStore::new(embedder))),
            splitter: CharacterTextSplitter::new(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl<L, E, V> EphemeralRAGEngine<L, E, V>
where
    L: LLMProvider,
    E: EmbeddingProvider + 'static,
    V: VectorStore,
{
    /// Swap the per-request collection for one built by `make_store`
    pub fn with_store_factory<W, F>(self, make_store: F) -> EphemeralRAGEngine<L, E, W>
    where
        W: VectorStore,
        F: Fn(Arc<E>) -> Arc<W> + Send + Sync + 'static,
    {
        EphemeralRAGEngine {
            llm: self.llm,
            embedder: self.embedder,
            make_store: Arc::new(make_store),
            splitter: self.splitter,
            top_k: self.top_k,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl<L, E, V> RAGEngine for EphemeralRAGEngine<L, E, V>
where
    L: LLMProvider + 'static,
    E: EmbeddingProvider + 'static,
    V: VectorStore + 'static,
{
    async fn answer(&self, query: &RAGQuery) -> Result<RAGResult> {
        let source = Document::new(query.content.as_str());
        let chunks = self.splitter.split_documents(&[source]);
        let chunk_count = chunks.len();

        let store = (self.make_store)(self.embedder.clone());
        store.add_documents(chunks).await?;
        let collection = store.collection_name().to_string();
        log::info!(
            "indexed {} chunks into {} with {}",
            chunk_count,
            collection,
            self.embedder.model_id()
        );

        let retriever = VectorStoreRetriever::new(store.clone()).with_top_k(self.top_k);
        let qa = RetrievalQA::from_llm(self.llm.clone(), retriever);
        let (answer, source_documents) = qa.call(&query.query).await?;

        store.delete_collection().await?;
        log::info!(
            "answered from {} chunks with {}, collection {} deleted",
            source_documents.len(),
            self.llm.model_id(),
            collection
        );

        Ok(RAGResult {
            answer,
            source_documents,
            metadata: Some(json!({
                "collection": collection,
                "chunks": chunk_count,
                "top_k": self.top_k,
                "llm_model": self.llm.model_id(),
                "embedding_model": self.embedder.model_id(),
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, KeywordEmbedder, RecordingLLM, StickyStore};
    use docqa_core::Error;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_answer_runs_full_pipeline() {
        let llm = Arc::new(RecordingLLM::answering("Paris."));
        let embedder = Arc::new(KeywordEmbedder::new());
        let engine = EphemeralRAGEngine::new(llm.clone(), embedder.clone());

        let content = format!(
            "{} Paris is the capital of France. {}",
            "filler ".repeat(100),
            "cats sleep ".repeat(60)
        );
        let result = engine
            .answer(&RAGQuery::new(content, "What is the capital of France?"))
            .await
            .unwrap();

        assert_eq!(result.answer, "Paris.");
        assert!(!result.source_documents.is_empty());
        assert!(result.source_documents[0].page_content.contains("Paris"));
        assert_eq!(embedder.document_calls(), 1);
        assert_eq!(embedder.query_calls(), 1);
        assert_eq!(llm.prompts().len(), 1);

        let metadata = result.metadata.unwrap();
        assert_eq!(metadata["top_k"], 4);
        assert_eq!(metadata["llm_model"], "recording-test");
        assert!(metadata["chunks"].as_u64().unwrap() > 1);
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_generation() {
        let llm = Arc::new(RecordingLLM::answering("unused"));
        let engine = EphemeralRAGEngine::new(llm.clone(), Arc::new(FailingEmbedder));

        let err = engine
            .answer(&RAGQuery::new("some text", "question?"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let llm = Arc::new(RecordingLLM::failing("model overloaded"));
        let engine = EphemeralRAGEngine::new(llm, Arc::new(KeywordEmbedder::new()));

        let err = engine
            .answer(&RAGQuery::new("some text", "question?"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "LLM provider error: model overloaded");
    }

    #[tokio::test]
    async fn test_custom_top_k_limits_sources() {
        let llm = Arc::new(RecordingLLM::answering("ok"));
        let engine =
            EphemeralRAGEngine::new(llm, Arc::new(KeywordEmbedder::new())).with_top_k(1);

        let result = engine
            .answer(&RAGQuery::new("rust ".repeat(400), "rust?"))
            .await
            .unwrap();

        assert_eq!(result.source_documents.len(), 1);
    }

    #[tokio::test]
    async fn test_successful_answer_deletes_collection() {
        let created: Arc<Mutex<Vec<Arc<LocalVectorStore<KeywordEmbedder>>>>> =
            Arc::new(Mutex::new(Vec::new()));
        let sink = created.clone();
        let engine = EphemeralRAGEngine::new(
            Arc::new(RecordingLLM::answering("ok")),
            Arc::new(KeywordEmbedder::new()),
        )
        .with_store_factory(move |embedder| {
            let store = Arc::new(LocalVectorStore::new(embedder));
            sink.lock().unwrap().push(store.clone());
            store
        });

        let result = engine
            .answer(&RAGQuery::new("rust code", "rust?"))
            .await
            .unwrap();

        let stores = created.lock().unwrap().clone();
        assert_eq!(stores.len(), 1);
        assert_eq!(result.metadata.unwrap()["collection"], stores[0].collection_name());
        let err = stores[0].count().await.unwrap_err();
        assert!(matches!(err, Error::VectorStore(ref msg) if msg.contains("has been deleted")));
    }

    #[tokio::test]
    async fn test_failed_cleanup_fails_the_answer() {
        let created: Arc<Mutex<Vec<Arc<StickyStore>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = created.clone();
        let llm = Arc::new(RecordingLLM::answering("discarded"));
        let engine = EphemeralRAGEngine::new(llm.clone(), Arc::new(KeywordEmbedder::new()))
            .with_store_factory(move |embedder| {
                let store = Arc::new(StickyStore::new(embedder));
                sink.lock().unwrap().push(store.clone());
                store
            });

        let err = engine
            .answer(&RAGQuery::new("rust code", "rust?"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Vector store error: collection is locked");
        assert_eq!(llm.prompts().len(), 1);
        let stores = created.lock().unwrap().clone();
        assert_eq!(stores[0].delete_calls(), 1);
    }
}
