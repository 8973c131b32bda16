// file: src/pipeline/ingestor.rs
// description: split, embed and store documents in an embedding store
// reference: pipeline orchestration

use super::progress::{IngestionStats, ProgressTracker};
use crate::embedding::EmbeddingModel;
use crate::error::{RagError, Result};
use crate::models::Document;
use crate::splitter::DocumentSplitter;
use crate::store::InMemoryEmbeddingStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_BATCH_SIZE: usize = 100;

pub struct EmbeddingStoreIngestor {
    splitter: Box<dyn DocumentSplitter>,
    embedding_model: Arc<dyn EmbeddingModel>,
    batch_size: usize,
    show_progress: bool,
    colored_progress: bool,
}

impl EmbeddingStoreIngestor {
    pub fn new(splitter: Box<dyn DocumentSplitter>, embedding_model: Arc<dyn EmbeddingModel>) -> Self {
        Self {
            splitter,
            embedding_model,
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: false,
            colored_progress: true,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Draws progress bars while ingesting, coloured or plain.
    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored_progress = colored;
        self
    }

    pub async fn ingest(
        &self,
        documents: &[Document],
        store: &mut InMemoryEmbeddingStore,
    ) -> Result<IngestionStats> {
        let tracker = if self.show_progress {
            ProgressTracker::with_color(0, self.colored_progress)
        } else {
            ProgressTracker::hidden()
        };

        for document in documents {
            let name = document.file_name().unwrap_or("<inline>");
            let segments = self.splitter.split(document);

            if segments.is_empty() {
                warn!("Document {} produced no segments", name);
                continue;
            }

            let chars: u64 = segments.iter().map(|s| s.char_len() as u64).sum();
            tracker.add_segments(segments.len(), chars);
            tracker.set_message(format!("Embedding {}", name));
            debug!("Split {} into {} segments", name, segments.len());

            let mut embeddings = Vec::with_capacity(segments.len());
            for batch in segments.chunks(self.batch_size) {
                let batch_embeddings = self.embedding_model.embed_all(batch).await?;
                if batch_embeddings.len() != batch.len() {
                    return Err(RagError::Embedding(format!(
                        "model {} returned {} embeddings for {} segments",
                        self.embedding_model.model_name(),
                        batch_embeddings.len(),
                        batch.len()
                    )));
                }
                tracker.inc_segments_embedded(batch.len());
                embeddings.extend(batch_embeddings);
            }

            let count = segments.len();
            store.add_all(embeddings, segments)?;
            tracker.inc_documents_ingested();

            info!("Ingested {} segments into embedding store for {}", count, name);
        }

        tracker.finish();
        Ok(tracker.get_stats())
    }
}
