// file: src/retriever/tavily.rs
// description: Tavily search API client implementing the web search engine trait
// reference: https://docs.tavily.com/documentation/api-reference/endpoint/search

use super::web_search::{WebSearchEngine, WebSearchResult};
use crate::config::{TAVILY_BASE_URL, WebSearchConfig};
use crate::error::{RagError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    score: Option<f64>,
}

pub struct TavilyWebSearchEngine {
    client: Client,
    api_key: String,
    base_url: String,
    search_depth: String,
}

impl TavilyWebSearchEngine {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: TAVILY_BASE_URL.to_string(),
            search_depth: "basic".to_string(),
        }
    }

    pub fn from_config(config: &WebSearchConfig, api_key: String) -> Self {
        let mut engine = Self::new(api_key);
        engine.base_url = config.base_url.trim_end_matches('/').to_string();
        engine.search_depth = config.search_depth.clone();
        engine
    }
}

fn into_results(body: TavilySearchResponse) -> Vec<WebSearchResult> {
    body.results
        .into_iter()
        .map(|r| WebSearchResult {
            title: r.title,
            url: r.url,
            snippet: r.content,
            score: r.score,
        })
        .collect()
}

#[async_trait]
impl WebSearchEngine for TavilyWebSearchEngine {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebSearchResult>> {
        let url = format!("{}/search", self.base_url);
        let request = TavilySearchRequest {
            api_key: &self.api_key,
            query,
            max_results,
            search_depth: &self.search_depth,
            include_answer: false,
        };

        debug!("Searching the web for: {}", query);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::WebSearch(format!("Failed to send Tavily request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::WebSearch(format!(
                "Tavily request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| RagError::WebSearch(format!("Failed to parse Tavily response: {}", e)))?;

        Ok(into_results(body))
    }
}
