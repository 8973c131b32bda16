// file: src/testing.rs
// description: in-process fakes for the chat model and retrievers used by unit tests

use crate::chat::ChatModel;
use crate::error::{RagError, Result};
use crate::models::{ChatMessage, ChatResponse, Content, Query};
use crate::retriever::ContentRetriever;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replies with queued answers in order, then repeats the last one.
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    fail: bool,
}

impl ScriptedChatModel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            last: Mutex::new(String::new()),
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(RagError::ChatModel("scripted failure".to_string()));
        }

        let mut last = self.last.lock().unwrap();
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            *last = reply;
        }
        Ok(ChatResponse::from_text(last.clone()))
    }
}

/// Always returns the same contents (or always fails) and counts its calls.
pub struct StaticRetriever {
    name: String,
    texts: Vec<String>,
    calls: AtomicUsize,
    fail: bool,
}

impl StaticRetriever {
    pub fn new(name: &str, texts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            texts: texts.iter().map(|t| t.to_string()).collect(),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, &[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentRetriever for StaticRetriever {
    async fn retrieve(&self, _query: &Query) -> Result<Vec<Content>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagError::WebSearch(format!("{} is unavailable", self.name)));
        }
        Ok(self.texts.iter().map(Content::from_text).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
