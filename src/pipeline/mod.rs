// file: src/pipeline/mod.rs
// description: ingestion pipeline module exports and public api
// reference: pipeline orchestration

mod ingestor;
mod progress;

pub use ingestor::EmbeddingStoreIngestor;
pub use progress::{IngestionStats, ProgressTracker};
