// file: src/store/mod.rs
// description: embedding store module exports and similarity helpers
// reference: internal module structure

pub mod memory;

pub use memory::{EmbeddingMatch, EmbeddingSearchRequest, InMemoryEmbeddingStore};

/// Cosine similarity in `[-1, 1]`; 0 when either vector has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Maps cosine similarity to a relevance score in `[0, 1]`.
pub fn relevance_score(cosine: f64) -> f64 {
    (cosine + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_bounds() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_relevance_score() {
        assert_eq!(relevance_score(1.0), 1.0);
        assert_eq!(relevance_score(-1.0), 0.0);
        assert_eq!(relevance_score(0.0), 0.5);
    }
}
