// file: src/embedding/mod.rs
// description: embedding model abstraction and provider selection
// reference: internal module structure

pub mod gemini;
pub mod hashing;

pub use gemini::GeminiEmbeddingModel;
pub use hashing::HashingEmbeddingModel;

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::Result;
use crate::models::{Embedding, TextSegment};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embeds a single query text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embeds segments for storage, one embedding per segment, in order.
    async fn embed_all(&self, segments: &[TextSegment]) -> Result<Vec<Embedding>>;

    /// Output dimension when known ahead of the first call.
    fn dimension(&self) -> Option<usize>;

    fn model_name(&self) -> &str;
}

pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingModel>> {
    Ok(match config.provider {
        EmbeddingProvider::Local => Arc::new(HashingEmbeddingModel::new(config.dimension)?),
        EmbeddingProvider::Gemini => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                crate::error::RagError::Config(format!(
                    "embedding provider 'gemini' needs an api key ({})",
                    crate::config::GEMINI_KEY_ENV
                ))
            })?;
            Arc::new(
                GeminiEmbeddingModel::new(api_key, config.model.clone())
                    .with_base_url(config.base_url.clone())
                    .with_batch_size(config.batch_size),
            )
        }
    })
}
