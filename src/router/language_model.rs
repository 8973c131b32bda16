// file: src/router/language_model.rs
// description: router letting the chat model pick retrievers from their descriptions

use super::QueryRouter;
use crate::chat::ChatModel;
use crate::error::{RagError, Result};
use crate::models::Query;
use crate::retriever::ContentRetriever;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// What to do when the model fails or its answer names no known option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackStrategy {
    #[default]
    DoNotRoute,
    RouteToAll,
    Fail,
}

pub struct LanguageModelQueryRouter {
    chat_model: Arc<dyn ChatModel>,
    options: Vec<(Arc<dyn ContentRetriever>, String)>,
    fallback: FallbackStrategy,
}

impl LanguageModelQueryRouter {
    /// `options` pairs each retriever with a description of what it knows.
    pub fn new(
        chat_model: Arc<dyn ChatModel>,
        options: Vec<(Arc<dyn ContentRetriever>, String)>,
    ) -> Self {
        Self {
            chat_model,
            options,
            fallback: FallbackStrategy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.fallback = fallback;
        self
    }

    fn prompt(&self, query: &str) -> String {
        let options = self
            .options
            .iter()
            .enumerate()
            .map(|(i, (_, description))| format!("{}: {}", i + 1, description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Based on the user query, determine the most suitable data source(s) \
             to retrieve relevant information from the following options:\n\
             {}\n\
             It is very important that your answer consists of either a single number \
             or multiple numbers separated by commas and nothing else!\n\
             User query: {}",
            options, query
        )
    }

    /// 0-based option indices named in `answer`, in order, without duplicates.
    fn parse_selection(&self, answer: &str) -> Vec<usize> {
        let mut selected = Vec::new();
        for m in NUMBER.find_iter(answer) {
            let Ok(n) = m.as_str().parse::<usize>() else {
                continue;
            };
            if (1..=self.options.len()).contains(&n) && !selected.contains(&(n - 1)) {
                selected.push(n - 1);
            }
        }
        selected
    }

    fn fallback(&self, reason: String) -> Result<Vec<Arc<dyn ContentRetriever>>> {
        warn!("Query routing fell back ({:?}): {}", self.fallback, reason);
        match self.fallback {
            FallbackStrategy::DoNotRoute => Ok(Vec::new()),
            FallbackStrategy::RouteToAll => Ok(self.all()),
            FallbackStrategy::Fail => Err(RagError::Routing(reason)),
        }
    }

    fn all(&self) -> Vec<Arc<dyn ContentRetriever>> {
        self.options.iter().map(|(r, _)| Arc::clone(r)).collect()
    }
}

#[async_trait]
impl QueryRouter for LanguageModelQueryRouter {
    async fn route(&self, query: &Query) -> Result<Vec<Arc<dyn ContentRetriever>>> {
        if self.options.len() == 1 {
            return Ok(self.all());
        }

        let answer = match self.chat_model.ask(&self.prompt(&query.text)).await {
            Ok(answer) => answer,
            Err(e) => return self.fallback(format!("chat model failed: {}", e)),
        };
        debug!("Router model answered: {}", answer.trim());

        let selected = self.parse_selection(&answer);
        if selected.is_empty() {
            return self.fallback(format!("unusable answer '{}'", answer.trim()));
        }

        let retrievers: Vec<Arc<dyn ContentRetriever>> = selected
            .into_iter()
            .map(|i| Arc::clone(&self.options[i].0))
            .collect();

        info!(
            "Routed query to: {}",
            retrievers
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(retrievers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedChatModel, StaticRetriever};

    fn router(model: ScriptedChatModel) -> LanguageModelQueryRouter {
        LanguageModelQueryRouter::new(
            Arc::new(model),
            vec![
                (
                    Arc::new(StaticRetriever::new("rag", &[])) as Arc<dyn ContentRetriever>,
                    "Fine-tuning RAG models and NLP".to_string(),
                ),
                (
                    Arc::new(StaticRetriever::new("rest", &[])) as Arc<dyn ContentRetriever>,
                    "RESTful APIs and web services".to_string(),
                ),
            ],
        )
    }

    async fn routed_names(router: &LanguageModelQueryRouter) -> Vec<String> {
        router
            .route(&Query::new("Explain REST"))
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_single_selection() {
        let router = router(ScriptedChatModel::new(&["2"]));
        assert_eq!(routed_names(&router).await, vec!["rest"]);
    }

    #[tokio::test]
    async fn test_multiple_selection() {
        let router = router(ScriptedChatModel::new(&["1, 2"]));
        assert_eq!(routed_names(&router).await, vec!["rag", "rest"]);
    }

    #[tokio::test]
    async fn test_lenient_parsing() {
        let trailing = router(ScriptedChatModel::new(&["2.\n"]));
        assert_eq!(routed_names(&trailing).await, vec!["rest"]);

        let out_of_range = router(ScriptedChatModel::new(&["7, 1, 1"]));
        assert_eq!(routed_names(&out_of_range).await, vec!["rag"]);
    }

    #[tokio::test]
    async fn test_unparseable_answer_does_not_route_by_default() {
        let router = router(ScriptedChatModel::new(&["none of them"]));
        assert!(routed_names(&router).await.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_route_to_all() {
        let router =
            router(ScriptedChatModel::failing()).with_fallback(FallbackStrategy::RouteToAll);
        assert_eq!(routed_names(&router).await, vec!["rag", "rest"]);
    }

    #[tokio::test]
    async fn test_fallback_fail() {
        let router = router(ScriptedChatModel::new(&["?"])).with_fallback(FallbackStrategy::Fail);
        let result = router.route(&Query::new("Explain REST")).await;
        assert!(matches!(result, Err(RagError::Routing(_))));
    }

    #[test]
    fn test_prompt_lists_options() {
        let router = router(ScriptedChatModel::new(&[]));
        let prompt = router.prompt("Explain REST");
        assert!(prompt.contains("1: Fine-tuning RAG models and NLP\n2: RESTful APIs and web services"));
        assert!(prompt.ends_with("User query: Explain REST"));
    }
}
