// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
//! Retrieval-augmented chat over PDF documents: loading, splitting,
//! embedding, in-memory similarity search, query routing and a chat
//! assistant backed by the Gemini API.

pub mod assistant;
pub mod augmentor;
pub mod chat;
pub mod config;
pub mod console;
pub mod embedding;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod retriever;
pub mod router;
pub mod splitter;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use assistant::{Assistant, AssistantBuilder};
pub use augmentor::{ContentAggregator, ContentInjector, DefaultRetrievalAugmentor};
pub use chat::{ChatModel, GeminiChatModel, MessageWindowChatMemory};
pub use config::{Config, EmbeddingProvider, SplitterKind};
pub use embedding::{EmbeddingModel, GeminiEmbeddingModel, HashingEmbeddingModel};
pub use error::{RagError, Result};
pub use models::{ChatMessage, Content, Document, Embedding, Query, TextSegment};
pub use parser::{DocumentParser, PdfDocumentParser, TextDocumentParser, load_document};
pub use pipeline::{EmbeddingStoreIngestor, IngestionStats};
pub use retriever::{
    ContentRetriever, EmbeddingStoreContentRetriever, TavilyWebSearchEngine,
    WebSearchContentRetriever, WebSearchEngine,
};
pub use router::{
    AiClassifierQueryRouter, DefaultQueryRouter, FallbackStrategy, LanguageModelQueryRouter,
    QueryRouter,
};
pub use splitter::{DocumentSplitter, FixedSizeSplitter, RecursiveSplitter};
pub use store::{EmbeddingSearchRequest, InMemoryEmbeddingStore};
pub use utils::Validator;
