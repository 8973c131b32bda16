// file: src/embedding/hashing.rs
// description: offline deterministic embedding model based on feature hashing

use super::EmbeddingModel;
use crate::error::{RagError, Result};
use crate::models::{Embedding, TextSegment};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Hashes lowercase words and character trigrams into a fixed number of
/// buckets and L2-normalizes the result. Texts sharing vocabulary end up
/// with a high cosine similarity, which is enough for local retrieval
/// without a hosted model.
pub struct HashingEmbeddingModel {
    dimension: usize,
    name: String,
}

impl HashingEmbeddingModel {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(RagError::Validation(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            name: format!("hashing-{}", dimension),
        })
    }

    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            self.add_feature(&mut vector, &word, 1.0);

            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            for trigram in padded.windows(3) {
                let trigram: String = trigram.iter().collect();
                self.add_feature(&mut vector, &trigram, 0.5);
            }
        }

        let mut embedding = Embedding::new(vector);
        embedding.normalize();
        embedding
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let bucket = u64::from_le_bytes([
            digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
        ]) as usize
            % self.dimension;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

#[async_trait]
impl EmbeddingModel for HashingEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(self.embed_text(text))
    }

    async fn embed_all(&self, segments: &[TextSegment]) -> Result<Vec<Embedding>> {
        Ok(segments.iter().map(|s| self.embed_text(&s.text)).collect())
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
