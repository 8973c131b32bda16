// file: src/retriever/embedding_store.rs
// description: retriever that embeds the query and searches an in-memory store
// reference: vector similarity search

use super::ContentRetriever;
use crate::embedding::EmbeddingModel;
use crate::error::Result;
use crate::models::{Content, Query};
use crate::store::{EmbeddingSearchRequest, InMemoryEmbeddingStore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_MAX_RESULTS: usize = 3;
pub const DEFAULT_MIN_SCORE: f64 = 0.0;

pub struct EmbeddingStoreContentRetriever {
    name: String,
    store: Arc<InMemoryEmbeddingStore>,
    embedding_model: Arc<dyn EmbeddingModel>,
    max_results: usize,
    min_score: f64,
}

impl EmbeddingStoreContentRetriever {
    pub fn new(store: Arc<InMemoryEmbeddingStore>, embedding_model: Arc<dyn EmbeddingModel>) -> Self {
        Self {
            name: "embedding-store".to_string(),
            store,
            embedding_model,
            max_results: DEFAULT_MAX_RESULTS,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }
}

#[async_trait]
impl ContentRetriever for EmbeddingStoreContentRetriever {
    async fn retrieve(&self, query: &Query) -> Result<Vec<Content>> {
        let query_embedding = self.embedding_model.embed(&query.text).await?;
        let request =
            EmbeddingSearchRequest::new(query_embedding, self.max_results, self.min_score);

        let matches = self.store.search(&request)?;
        debug!(
            "Retriever {} found {} segments (min score {})",
            self.name,
            matches.len(),
            self.min_score
        );

        Ok(matches
            .into_iter()
            .filter_map(|m| m.embedded)
            .map(Content::new)
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbeddingModel;
    use crate::models::TextSegment;

    async fn retriever(max_results: usize, min_score: f64) -> EmbeddingStoreContentRetriever {
        let model = Arc::new(HashingEmbeddingModel::new(256).unwrap());
        let segments = vec![
            TextSegment::from_text("Fine-tuning adapts a language model to a task"),
            TextSegment::from_text("REST resources are addressed with URIs"),
            TextSegment::from_text("Retrieval augmented generation grounds a language model"),
        ];
        let embeddings = model.embed_all(&segments).await.unwrap();
        let mut store = InMemoryEmbeddingStore::new();
        store.add_all(embeddings, segments).unwrap();

        EmbeddingStoreContentRetriever::new(Arc::new(store), model)
            .with_max_results(max_results)
            .with_min_score(min_score)
            .with_name("rag-docs")
    }

    #[tokio::test]
    async fn test_retrieves_most_relevant_first() {
        let retriever = retriever(1, 0.0).await;
        let contents = retriever
            .retrieve(&Query::new("How are REST resources addressed?"))
            .await
            .unwrap();

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].text(), "REST resources are addressed with URIs");
        assert_eq!(retriever.name(), "rag-docs");
    }

    #[tokio::test]
    async fn test_min_score_excludes_everything() {
        let retriever = retriever(3, 1.0).await;
        let contents = retriever
            .retrieve(&Query::new("completely different words"))
            .await
            .unwrap();
        assert!(contents.is_empty());
    }
}
