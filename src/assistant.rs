// file: src/assistant.rs
// description: chat assistant combining a chat model, memory and retrieval augmentation

use crate::augmentor::DefaultRetrievalAugmentor;
use crate::chat::{ChatModel, MessageWindowChatMemory};
use crate::error::{RagError, Result};
use crate::models::{ChatMessage, Query};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct Assistant {
    chat_model: Arc<dyn ChatModel>,
    memory: Option<Mutex<MessageWindowChatMemory>>,
    augmentor: Option<DefaultRetrievalAugmentor>,
    system_message: Option<String>,
}

pub struct AssistantBuilder {
    chat_model: Arc<dyn ChatModel>,
    memory: Option<MessageWindowChatMemory>,
    augmentor: Option<DefaultRetrievalAugmentor>,
    system_message: Option<String>,
}

impl AssistantBuilder {
    pub fn chat_memory(mut self, memory: MessageWindowChatMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn retrieval_augmentor(mut self, augmentor: DefaultRetrievalAugmentor) -> Self {
        self.augmentor = Some(augmentor);
        self
    }

    pub fn system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn build(self) -> Assistant {
        Assistant {
            chat_model: self.chat_model,
            memory: self.memory.map(Mutex::new),
            augmentor: self.augmentor,
            system_message: self.system_message,
        }
    }
}

impl Assistant {
    pub fn builder(chat_model: Arc<dyn ChatModel>) -> AssistantBuilder {
        AssistantBuilder {
            chat_model,
            memory: None,
            augmentor: None,
            system_message: None,
        }
    }

    /// Answers `question`, recording the exchange in memory when configured.
    pub async fn chat(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::Validation("Question is empty".to_string()));
        }

        let Some(memory) = &self.memory else {
            let mut messages = Vec::with_capacity(2);
            if let Some(system) = &self.system_message {
                messages.push(ChatMessage::system(system));
            }
            messages.push(self.augment(Query::new(question)).await?);
            let response = self.chat_model.chat(&messages).await?;
            return Ok(response.text);
        };

        let mut memory = memory.lock().await;
        if let Some(system) = &self.system_message {
            memory.add(ChatMessage::system(system));
        }

        let query = Query::new(question).with_history(memory.messages());
        let user_message = self.augment(query).await?;
        memory.add(user_message);

        let messages = memory.messages();
        debug!("Sending {} messages to chat model", messages.len());
        let response = self.chat_model.chat(&messages).await?;

        memory.add(ChatMessage::assistant(&response.text));
        Ok(response.text)
    }

    /// Snapshot of the conversation memory, empty when none is configured.
    pub async fn history(&self) -> Vec<ChatMessage> {
        match &self.memory {
            Some(memory) => memory.lock().await.messages(),
            None => Vec::new(),
        }
    }

    async fn augment(&self, query: Query) -> Result<ChatMessage> {
        match &self.augmentor {
            Some(augmentor) => Ok(augmentor.augment(&query).await?.user_message),
            None => Ok(ChatMessage::user(query.text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::retriever::ContentRetriever;
    use crate::router::{AiClassifierQueryRouter, DefaultQueryRouter};
    use crate::testing::{ScriptedChatModel, StaticRetriever};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_memory_holds_augmented_message_and_answer() {
        let model = Arc::new(ScriptedChatModel::new(&["RAG grounds answers in documents."]));
        let retriever: Arc<dyn ContentRetriever> =
            Arc::new(StaticRetriever::new("pdf", &["RAG retrieves segments."]));
        let augmentor =
            DefaultRetrievalAugmentor::new(Arc::new(DefaultQueryRouter::new(vec![retriever])));

        let assistant = Assistant::builder(model.clone())
            .chat_memory(MessageWindowChatMemory::with_max_messages(10))
            .retrieval_augmentor(augmentor)
            .build();

        let answer = assistant.chat("What is RAG?").await.unwrap();
        assert_eq!(answer, "RAG grounds answers in documents.");

        let history = assistant.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert!(history[0].text.contains("RAG retrieves segments."));
        assert_eq!(history[1], ChatMessage::assistant("RAG grounds answers in documents."));
    }

    #[tokio::test]
    async fn test_memory_is_sent_on_following_turns() {
        let model = Arc::new(ScriptedChatModel::new(&["first", "second"]));
        let assistant = Assistant::builder(model.clone())
            .chat_memory(MessageWindowChatMemory::default())
            .system_message("Réponds en français.")
            .build();

        assistant.chat("one").await.unwrap();
        assistant.chat("two").await.unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1],
            vec![
                ChatMessage::system("Réponds en français."),
                ChatMessage::user("one"),
                ChatMessage::assistant("first"),
                ChatMessage::user("two"),
            ]
        );
    }

    #[tokio::test]
    async fn test_classifier_skips_retrieval() {
        let model = Arc::new(ScriptedChatModel::new(&["non", "Bonjour !"]));
        let retriever = Arc::new(StaticRetriever::new("pdf", &["unused"]));
        let router = AiClassifierQueryRouter::new(model.clone(), retriever.clone());

        let assistant = Assistant::builder(model.clone())
            .retrieval_augmentor(DefaultRetrievalAugmentor::new(Arc::new(router)))
            .build();

        let answer = assistant.chat("Bonjour").await.unwrap();
        assert_eq!(answer, "Bonjour !");
        assert_eq!(retriever.calls(), 0);
        assert_eq!(model.requests()[1], vec![ChatMessage::user("Bonjour")]);
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let assistant = Assistant::builder(Arc::new(ScriptedChatModel::new(&["x"]))).build();
        assert!(matches!(
            assistant.chat("   ").await,
            Err(RagError::Validation(_))
        ));
    }
}
