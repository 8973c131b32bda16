// file: src/retriever/mod.rs
// description: content retrievers backed by the embedding store and web search
// reference: internal module structure

pub mod embedding_store;
pub mod tavily;
pub mod web_search;

pub use embedding_store::EmbeddingStoreContentRetriever;
pub use tavily::TavilyWebSearchEngine;
pub use web_search::{WebSearchContentRetriever, WebSearchEngine, WebSearchResult};

use crate::error::Result;
use crate::models::{Content, Query};
use async_trait::async_trait;

#[async_trait]
pub trait ContentRetriever: Send + Sync {
    async fn retrieve(&self, query: &Query) -> Result<Vec<Content>>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}
