// file: src/router/mod.rs
// description: query routers deciding which retrievers answer a query
// reference: internal module structure

pub mod classifier;
pub mod default;
pub mod language_model;

pub use classifier::AiClassifierQueryRouter;
pub use default::DefaultQueryRouter;
pub use language_model::{FallbackStrategy, LanguageModelQueryRouter};

use crate::error::Result;
use crate::models::Query;
use crate::retriever::ContentRetriever;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait QueryRouter: Send + Sync {
    /// Retrievers to consult for `query`; empty means answer without retrieval.
    async fn route(&self, query: &Query) -> Result<Vec<Arc<dyn ContentRetriever>>>;
}
