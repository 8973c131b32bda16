// file: src/router/classifier.rs
// description: router asking the chat model whether a query is about AI

use super::QueryRouter;
use crate::chat::ChatModel;
use crate::error::Result;
use crate::models::Query;
use crate::retriever::ContentRetriever;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Consults its retriever unless the model answers `non` to
/// "is this query about artificial intelligence?".
pub struct AiClassifierQueryRouter {
    chat_model: Arc<dyn ChatModel>,
    retriever: Arc<dyn ContentRetriever>,
}

impl AiClassifierQueryRouter {
    pub fn new(chat_model: Arc<dyn ChatModel>, retriever: Arc<dyn ContentRetriever>) -> Self {
        Self {
            chat_model,
            retriever,
        }
    }

    fn prompt(query: &str) -> String {
        format!(
            "Est-ce que la requête '{}' porte sur l'IA ? \
             Réponds seulement par 'oui', 'non', ou 'peut-être'.",
            query
        )
    }
}

/// `true` when the classifier's answer rules out retrieval.
pub fn is_negative(answer: &str) -> bool {
    answer.to_lowercase().contains("non")
}

#[async_trait]
impl QueryRouter for AiClassifierQueryRouter {
    async fn route(&self, query: &Query) -> Result<Vec<Arc<dyn ContentRetriever>>> {
        let answer = self.chat_model.ask(&Self::prompt(&query.text)).await?;
        info!("Classifier answered '{}' for query '{}'", answer.trim(), query.text);

        if is_negative(&answer) {
            Ok(Vec::new())
        } else {
            Ok(vec![Arc::clone(&self.retriever)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedChatModel, StaticRetriever};

    async fn route_with(answer: &str) -> usize {
        let model = Arc::new(ScriptedChatModel::new(&[answer]));
        let router =
            AiClassifierQueryRouter::new(model, Arc::new(StaticRetriever::new("pdf", &[])));
        router.route(&Query::new("Bonjour")).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_non_skips_retrieval() {
        assert_eq!(route_with("non").await, 0);
        assert_eq!(route_with("Non.").await, 0);
    }

    #[tokio::test]
    async fn test_other_answers_use_retriever() {
        assert_eq!(route_with("oui").await, 1);
        assert_eq!(route_with("peut-être").await, 1);
        assert_eq!(route_with("").await, 1);
    }

    #[tokio::test]
    async fn test_prompt_contains_query() {
        let model = Arc::new(ScriptedChatModel::new(&["oui"]));
        let router = AiClassifierQueryRouter::new(
            model.clone(),
            Arc::new(StaticRetriever::new("pdf", &[])),
        );
        router.route(&Query::new("Qu'est-ce que RAG ?")).await.unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0][0].text.contains("'Qu'est-ce que RAG ?'"));
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let router = AiClassifierQueryRouter::new(
            Arc::new(ScriptedChatModel::failing()),
            Arc::new(StaticRetriever::new("pdf", &[])),
        );
        assert!(router.route(&Query::new("x")).await.is_err());
    }
}
