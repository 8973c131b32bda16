// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod content;
pub mod document;
pub mod message;
pub mod metadata;
pub mod segment;

pub use content::{Content, Embedding, Query};
pub use document::Document;
pub use message::{ChatMessage, ChatResponse, Role, TokenUsage};
pub use metadata::Metadata;
pub use segment::TextSegment;
