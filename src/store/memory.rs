// file: src/store/memory.rs
// description: list-backed in-memory embedding store with JSON persistence
// reference: vector similarity search over stored segments

use super::{cosine_similarity, relevance_score};
use crate::error::{RagError, Result};
use crate::models::{Embedding, TextSegment};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    id: String,
    embedding: Embedding,
    embedded: Option<TextSegment>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingSearchRequest {
    pub query_embedding: Embedding,
    pub max_results: usize,
    pub min_score: f64,
}

impl EmbeddingSearchRequest {
    pub fn new(query_embedding: Embedding, max_results: usize, min_score: f64) -> Self {
        Self {
            query_embedding,
            max_results,
            min_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatch {
    /// Relevance score in `[0, 1]`, higher is more similar.
    pub score: f64,
    pub embedding_id: String,
    pub embedding: Embedding,
    pub embedded: Option<TextSegment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryEmbeddingStore {
    entries: Vec<Entry>,
}

impl InMemoryEmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, embedding: Embedding) -> Result<String> {
        self.push(embedding, None)
    }

    pub fn add_with_segment(&mut self, embedding: Embedding, segment: TextSegment) -> Result<String> {
        self.push(embedding, Some(segment))
    }

    /// Adds embeddings paired with the segments they were computed from.
    pub fn add_all(
        &mut self,
        embeddings: Vec<Embedding>,
        segments: Vec<TextSegment>,
    ) -> Result<Vec<String>> {
        if embeddings.len() != segments.len() {
            return Err(RagError::Store(format!(
                "{} embeddings do not match {} segments",
                embeddings.len(),
                segments.len()
            )));
        }

        // Nothing is written unless the whole batch fits the store dimension.
        let expected = self
            .dimension()
            .or_else(|| embeddings.first().map(Embedding::dimension));
        if let Some(expected) = expected {
            for embedding in &embeddings {
                self.check_dimension(embedding.dimension(), expected)?;
            }
        }

        embeddings
            .into_iter()
            .zip(segments)
            .map(|(embedding, segment)| self.push(embedding, Some(segment)))
            .collect()
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    /// Dimension of the stored embeddings, `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.embedding.dimension())
    }

    fn check_dimension(&self, actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(RagError::Store(format!(
                "embedding dimension {} does not match store dimension {}",
                actual, expected
            )));
        }
        Ok(())
    }

    fn push(&mut self, embedding: Embedding, embedded: Option<TextSegment>) -> Result<String> {
        if let Some(expected) = self.dimension() {
            self.check_dimension(embedding.dimension(), expected)?;
        }

        let id = Uuid::new_v4().to_string();
        self.entries.push(Entry {
            id: id.clone(),
            embedding,
            embedded,
        });
        Ok(id)
    }

    /// Returns the entries scoring at least `min_score`, best first.
    pub fn search(&self, request: &EmbeddingSearchRequest) -> Result<Vec<EmbeddingMatch>> {
        let query = &request.query_embedding;

        if let Some(expected) = self.dimension() {
            if expected != query.dimension() {
                return Err(RagError::Store(format!(
                    "query dimension {} does not match store dimension {}",
                    query.dimension(),
                    expected
                )));
            }
        }

        let mut matches: Vec<EmbeddingMatch> = self
            .entries
            .iter()
            .map(|entry| {
                let cosine = cosine_similarity(&query.vector, &entry.embedding.vector);
                (relevance_score(cosine), entry)
            })
            .filter(|(score, _)| *score >= request.min_score)
            .map(|(score, entry)| EmbeddingMatch {
                score,
                embedding_id: entry.id.clone(),
                embedding: entry.embedding.clone(),
                embedded: entry.embedded.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches.truncate(request.max_results);

        debug!(
            "Embedding search over {} entries returned {} matches",
            self.entries.len(),
            matches.len()
        );
        Ok(matches)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        info!("Saved {} embeddings to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&json)?;
        info!("Loaded {} embeddings from {}", store.len(), path.display());
        Ok(store)
    }
}
