// file: src/router/default.rs
// description: router that sends every query to all configured retrievers

use super::QueryRouter;
use crate::error::Result;
use crate::models::Query;
use crate::retriever::ContentRetriever;
use async_trait::async_trait;
use std::sync::Arc;

pub struct DefaultQueryRouter {
    retrievers: Vec<Arc<dyn ContentRetriever>>,
}

impl DefaultQueryRouter {
    pub fn new(retrievers: Vec<Arc<dyn ContentRetriever>>) -> Self {
        Self { retrievers }
    }
}

#[async_trait]
impl QueryRouter for DefaultQueryRouter {
    async fn route(&self, _query: &Query) -> Result<Vec<Arc<dyn ContentRetriever>>> {
        Ok(self.retrievers.clone())
    }
}
