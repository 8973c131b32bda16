// file: src/retriever/web_search.rs
// description: web search abstraction and the retriever built on it

use super::ContentRetriever;
use crate::error::Result;
use crate::models::{Content, Metadata, Query, TextSegment, metadata};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: Option<f64>,
}

impl WebSearchResult {
    /// Title and snippet on separate lines, with the url kept as metadata.
    pub fn to_text_segment(&self) -> TextSegment {
        let text = if self.title.is_empty() {
            self.snippet.clone()
        } else {
            format!("{}\n{}", self.title, self.snippet)
        };
        TextSegment::new(text, Metadata::new().with(metadata::URL, &self.url))
    }
}

#[async_trait]
pub trait WebSearchEngine: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebSearchResult>>;
}

pub struct WebSearchContentRetriever {
    engine: Arc<dyn WebSearchEngine>,
    max_results: usize,
}

impl WebSearchContentRetriever {
    pub fn new(engine: Arc<dyn WebSearchEngine>, max_results: usize) -> Self {
        Self {
            engine,
            max_results: max_results.max(1),
        }
    }
}

#[async_trait]
impl ContentRetriever for WebSearchContentRetriever {
    async fn retrieve(&self, query: &Query) -> Result<Vec<Content>> {
        let results = self.engine.search(&query.text, self.max_results).await?;
        debug!("Web search returned {} results", results.len());

        Ok(results
            .iter()
            .take(self.max_results)
            .map(|r| Content::new(r.to_text_segment()))
            .collect())
    }

    fn name(&self) -> &str {
        "web-search"
    }
}
