// file: src/chat/gemini.rs
// description: Gemini generateContent client implementing the chat model trait
// reference: https://ai.google.dev/api/generate-content

use super::ChatModel;
use crate::config::{ChatConfig, GEMINI_BASE_URL};
use crate::error::{RagError, Result};
use crate::models::{ChatMessage, ChatResponse, Role, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

pub struct GeminiChatModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    log_requests: bool,
}

impl GeminiChatModel {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: None,
            log_requests: false,
        }
    }

    pub fn from_config(config: &ChatConfig, api_key: String) -> Self {
        let mut model = Self::new(api_key, config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_log_requests(config.log_requests);
        model.temperature = config.temperature;
        model
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_log_requests(mut self, log_requests: bool) -> Self {
        self.log_requests = log_requests;
        self
    }

    /// Request and response bodies go to `info` when `log_requests` is set.
    fn log_traffic(&self, message: &str) {
        if self.log_requests {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }

    fn build_request(&self, messages: &[ChatMessage]) -> GenerateContentRequest {
        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.is_system())
            .map(|m| m.text.as_str())
            .collect();

        let system_instruction = (!system_text.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: system_text.join("\n"),
            }],
        });

        let contents = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| Content {
                role: Some(
                    match m.role {
                        Role::Assistant => "model",
                        _ => "user",
                    }
                    .to_string(),
                ),
                parts: vec![Part {
                    text: m.text.clone(),
                }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: self
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        }
    }
}

fn into_chat_response(body: GenerateContentResponse) -> Result<ChatResponse> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| RagError::ChatModel("Gemini API returned no candidates".to_string()))?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let token_usage = body.usage_metadata.map(|u| TokenUsage {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    Ok(ChatResponse {
        text,
        token_usage,
        finish_reason: candidate.finish_reason,
    })
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = self.build_request(messages);

        self.log_traffic(&format!(
            "Gemini request: {}",
            serde_json::to_string(&request).unwrap_or_default()
        ));

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::ChatModel(format!("Failed to send Gemini API request: {}", e)))?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| {
            RagError::ChatModel(format!("Failed to read Gemini API response: {}", e))
        })?;

        self.log_traffic(&format!("Gemini response ({}): {}", status, body_text));

        if !status.is_success() {
            return Err(RagError::ChatModel(format!(
                "Gemini API request failed with status {}: {}",
                status, body_text
            )));
        }

        let body: GenerateContentResponse = serde_json::from_str(&body_text).map_err(|e| {
            RagError::ChatModel(format!("Failed to parse Gemini API response: {}", e))
        })?;

        let chat_response = into_chat_response(body)?;
        if let Some(usage) = chat_response.token_usage {
            info!(
                "Gemini {} used {} tokens ({} in, {} out)",
                self.model, usage.total_tokens, usage.input_tokens, usage.output_tokens
            );
        }
        Ok(chat_response)
    }
}
