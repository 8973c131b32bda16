// file: src/embedding/gemini.rs
// description: Gemini API integration for text embeddings (text-embedding-004)
// reference: https://ai.google.dev/api/embeddings

use super::EmbeddingModel;
use crate::config::GEMINI_BASE_URL;
use crate::error::{RagError, Result};
use crate::models::{Embedding, TextSegment};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: RequestContent,
    task_type: TaskType,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

pub struct GeminiEmbeddingModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    batch_size: usize,
}

impl GeminiEmbeddingModel {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
            batch_size: MAX_BATCH_SIZE,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    fn build_request(&self, texts: &[&str], task_type: TaskType) -> BatchEmbedRequest {
        BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", self.model),
                    content: RequestContent {
                        parts: vec![RequestPart {
                            text: text.to_string(),
                        }],
                    },
                    task_type,
                })
                .collect(),
        }
    }

    async fn embed_batch(&self, texts: &[&str], task_type: TaskType) -> Result<Vec<Embedding>> {
        let url = format!("{}/models/{}:batchEmbedContents", self.base_url, self.model);
        let request = self.build_request(texts, task_type);

        debug!("Requesting {} embeddings from Gemini API", texts.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                RagError::Embedding(format!("Failed to send Gemini API request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Embedding(format!(
                "Gemini API request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: BatchEmbedResponse = response.json().await.map_err(|e| {
            RagError::Embedding(format!("Failed to parse Gemini API response: {}", e))
        })?;

        into_embeddings(body, texts.len())
    }
}

fn into_embeddings(body: BatchEmbedResponse, expected: usize) -> Result<Vec<Embedding>> {
    if body.embeddings.len() != expected {
        return Err(RagError::Embedding(format!(
            "Gemini API returned {} embeddings for {} inputs",
            body.embeddings.len(),
            expected
        )));
    }

    let embeddings: Vec<Embedding> = body
        .embeddings
        .into_iter()
        .map(|e| Embedding::new(e.values))
        .collect();

    if let Some(first) = embeddings.first() {
        debug!("Received embeddings of dimension {}", first.dimension());
    }
    Ok(embeddings)
}

#[async_trait]
impl EmbeddingModel for GeminiEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.embed_batch(&[text], TaskType::RetrievalQuery)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("No embedding data returned".to_string()))
    }

    async fn embed_all(&self, segments: &[TextSegment]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(segments.len());

        for batch in segments.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|s| s.text.as_str()).collect();
            embeddings.extend(self.embed_batch(&texts, TaskType::RetrievalDocument).await?);
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> Option<usize> {
        match self.model.as_str() {
            "text-embedding-004" | "embedding-001" => Some(768),
            _ => None,
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let model = GeminiEmbeddingModel::new("key".to_string(), "text-embedding-004".to_string());
        let request = model.build_request(&["hello"], TaskType::RetrievalDocument);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "requests": [{
                    "model": "models/text-embedding-004",
                    "content": { "parts": [{ "text": "hello" }] },
                    "taskType": "RETRIEVAL_DOCUMENT"
                }]
            })
        );
    }

    #[test]
    fn test_response_count_mismatch() {
        let body: BatchEmbedResponse = serde_json::from_value(json!({
            "embeddings": [{ "values": [0.1, 0.2] }]
        }))
        .unwrap();
        assert!(into_embeddings(body, 2).is_err());
    }

    #[test]
    fn test_response_parsing() {
        let body: BatchEmbedResponse = serde_json::from_value(json!({
            "embeddings": [{ "values": [0.1, 0.2] }, { "values": [0.3, 0.4] }]
        }))
        .unwrap();
        let embeddings = into_embeddings(body, 2).unwrap();
        assert_eq!(embeddings[1].vector, vec![0.3, 0.4]);
    }

    #[test]
    fn test_batch_size_clamped() {
        let model = GeminiEmbeddingModel::new("key".to_string(), "text-embedding-004".to_string())
            .with_batch_size(500)
            .with_base_url("http://localhost:8080/".to_string());
        assert_eq!(model.batch_size, MAX_BATCH_SIZE);
        assert_eq!(model.base_url, "http://localhost:8080");
        assert_eq!(model.dimension(), Some(768));
    }
}
