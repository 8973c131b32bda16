// file: src/augmentor/mod.rs
// description: retrieval augmentation of user messages
// reference: internal module structure

pub mod aggregator;
pub mod injector;

pub use aggregator::ContentAggregator;
pub use injector::ContentInjector;

use crate::error::Result;
use crate::models::{ChatMessage, Content, Query};
use crate::router::QueryRouter;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct AugmentationResult {
    pub user_message: ChatMessage,
    pub contents: Vec<Content>,
}

/// Routes the query, runs the selected retrievers concurrently, merges their
/// results and injects them into the user message.
pub struct DefaultRetrievalAugmentor {
    router: Arc<dyn QueryRouter>,
    aggregator: ContentAggregator,
    injector: ContentInjector,
}

impl DefaultRetrievalAugmentor {
    pub fn new(router: Arc<dyn QueryRouter>) -> Self {
        Self {
            router,
            aggregator: ContentAggregator::default(),
            injector: ContentInjector::default(),
        }
    }

    pub async fn augment(&self, query: &Query) -> Result<AugmentationResult> {
        let retrievers = self.router.route(query).await?;

        if retrievers.is_empty() {
            info!("No retriever selected, answering without retrieval");
            return Ok(AugmentationResult {
                user_message: ChatMessage::user(&query.text),
                contents: Vec::new(),
            });
        }

        let results = join_all(retrievers.iter().map(|r| r.retrieve(query)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        for (retriever, contents) in retrievers.iter().zip(&results) {
            debug!("Retriever {} returned {} contents", retriever.name(), contents.len());
        }

        let contents = self.aggregator.aggregate(results);
        info!(
            "Augmenting query with {} contents from {} retriever(s)",
            contents.len(),
            retrievers.len()
        );

        Ok(AugmentationResult {
            user_message: self.injector.inject(&contents, &query.text),
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::ContentRetriever;
    use crate::router::DefaultQueryRouter;
    use crate::testing::StaticRetriever;

    #[tokio::test]
    async fn test_no_retrievers_leaves_message_unchanged() {
        let augmentor = DefaultRetrievalAugmentor::new(Arc::new(DefaultQueryRouter::new(vec![])));
        let result = augmentor.augment(&Query::new("Bonjour")).await.unwrap();

        assert_eq!(result.user_message, ChatMessage::user("Bonjour"));
        assert!(result.contents.is_empty());
    }

    #[tokio::test]
    async fn test_all_selected_retrievers_are_consulted() {
        let pdf = Arc::new(StaticRetriever::new("pdf", &["from pdf"]));
        let web = Arc::new(StaticRetriever::new("web", &["from web"]));
        let router = DefaultQueryRouter::new(vec![
            pdf.clone() as Arc<dyn ContentRetriever>,
            web.clone() as Arc<dyn ContentRetriever>,
        ]);
        let augmentor = DefaultRetrievalAugmentor::new(Arc::new(router));

        let result = augmentor.augment(&Query::new("question")).await.unwrap();

        assert_eq!(pdf.calls(), 1);
        assert_eq!(web.calls(), 1);
        assert_eq!(result.contents.len(), 2);
        assert!(result.user_message.text.starts_with("question\n\nAnswer using"));
        assert!(result.user_message.text.contains("from pdf"));
        assert!(result.user_message.text.contains("from web"));
    }

    #[tokio::test]
    async fn test_retriever_failure_propagates() {
        let pdf = Arc::new(StaticRetriever::new("pdf", &["from pdf"]));
        let web = Arc::new(StaticRetriever::failing("web"));
        let router = DefaultQueryRouter::new(vec![
            pdf.clone() as Arc<dyn ContentRetriever>,
            web.clone() as Arc<dyn ContentRetriever>,
        ]);
        let augmentor = DefaultRetrievalAugmentor::new(Arc::new(router));

        let result = augmentor.augment(&Query::new("question")).await;

        assert!(matches!(result, Err(crate::error::RagError::WebSearch(_))));
        assert_eq!(pdf.calls(), 1);
        assert_eq!(web.calls(), 1);
    }
}
