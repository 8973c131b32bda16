// file: src/models/content.rs
// description: retrieved content, queries and embedding values
// reference: Used for vector similarity search results

use super::{ChatMessage, TextSegment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub vector: Vec<f32>,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    pub fn norm(&self) -> f32 {
        self.vector.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Scales the vector to unit length. A zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            self.vector.iter_mut().for_each(|v| *v /= norm);
        }
    }
}

/// A piece of text handed back by a content retriever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub text_segment: TextSegment,
}

impl Content {
    pub fn new(text_segment: TextSegment) -> Self {
        Self { text_segment }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(TextSegment::from_text(text))
    }

    pub fn text(&self) -> &str {
        &self.text_segment.text
    }
}

/// The user's question as seen by routers and retrievers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub text: String,
    pub history: Vec<ChatMessage>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}
