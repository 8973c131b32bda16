// file: src/models/segment.rs
// description: text segment model produced by document splitters
// reference: internal data structures

use super::metadata::{self, Metadata};
use super::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    pub text: String,
    pub metadata: Metadata,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, Metadata::new())
    }

    /// Segment `index` of `document`, inheriting the document metadata.
    pub fn from_document(document: &Document, text: impl Into<String>, index: usize) -> Self {
        let metadata = document.metadata.clone().with(metadata::INDEX, index);
        Self::new(text, metadata)
    }

    pub fn index(&self) -> Option<usize> {
        self.metadata.get(metadata::INDEX)?.parse().ok()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
