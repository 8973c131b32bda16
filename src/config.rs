// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{RagError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const GEMINI_KEY_ENV: &str = "GEMINI_KEY";
pub const TAVILY_KEY_ENV: &str = "TAVILY_KEY";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub chat: ChatConfig,
    pub embedding: EmbeddingConfig,
    pub ingestion: IngestionConfig,
    pub retrieval: RetrievalConfig,
    pub web_search: WebSearchConfig,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub log_requests: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Gemini,
    Local,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    Recursive,
    Fixed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestionConfig {
    #[serde(default)]
    pub documents: Vec<PathBuf>,
    pub splitter: SplitterKind,
    pub segment_size: usize,
    pub overlap: usize,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    pub max_results: usize,
    pub min_score: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSearchConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: usize,
    pub search_depth: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    pub memory_size: usize,
    pub system_message: Option<String>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RAG_ASSISTANT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| RagError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| RagError::Config(e.to_string()))?;

        config.apply_key_env();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        dotenv().ok();

        let mut config = Self {
            chat: ChatConfig {
                api_key: None,
                base_url: GEMINI_BASE_URL.to_string(),
                model: "gemini-2.5-flash".to_string(),
                temperature: Some(0.3),
                log_requests: true,
            },
            embedding: EmbeddingConfig {
                provider: EmbeddingProvider::Local,
                api_key: None,
                base_url: GEMINI_BASE_URL.to_string(),
                model: "text-embedding-004".to_string(),
                dimension: 384,
                batch_size: 100,
            },
            ingestion: IngestionConfig {
                documents: vec![PathBuf::from("resources/FineTuningRAG.pdf")],
                splitter: SplitterKind::Recursive,
                segment_size: 300,
                overlap: 30,
                show_progress: true,
            },
            retrieval: RetrievalConfig {
                max_results: 2,
                min_score: 0.5,
            },
            web_search: WebSearchConfig {
                api_key: None,
                base_url: TAVILY_BASE_URL.to_string(),
                max_results: 3,
                search_depth: "basic".to_string(),
            },
            assistant: AssistantConfig {
                memory_size: 10,
                system_message: None,
            },
        };
        config.apply_key_env();
        config
    }

    /// Fills missing API keys from `GEMINI_KEY` / `TAVILY_KEY`.
    fn apply_key_env(&mut self) {
        let gemini_key = std::env::var(GEMINI_KEY_ENV).ok().filter(|k| !k.is_empty());
        if self.chat.api_key.is_none() {
            self.chat.api_key = gemini_key.clone();
        }
        if self.embedding.api_key.is_none() {
            self.embedding.api_key = gemini_key;
        }
        if self.web_search.api_key.is_none() {
            self.web_search.api_key = std::env::var(TAVILY_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingestion.segment_size == 0 {
            return Err(RagError::Config(
                "segment_size must be greater than 0".to_string(),
            ));
        }

        if self.ingestion.splitter == SplitterKind::Recursive
            && self.ingestion.overlap >= self.ingestion.segment_size
        {
            return Err(RagError::Config(
                "overlap must be smaller than segment_size".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.retrieval.min_score) {
            return Err(RagError::Config(
                "min_score must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.retrieval.max_results == 0 {
            return Err(RagError::Config(
                "max_results must be greater than 0".to_string(),
            ));
        }

        if !(1..=100).contains(&self.embedding.batch_size) {
            return Err(RagError::Config(
                "embedding batch_size must be between 1 and 100".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(RagError::Config(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }

        if self.assistant.memory_size == 0 {
            return Err(RagError::Config(
                "memory_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn require_chat_key(&self) -> Result<&str> {
        self.chat.api_key.as_deref().ok_or_else(|| {
            RagError::Config(format!(
                "chat api_key is not set (export {} or RAG_ASSISTANT__CHAT__API_KEY)",
                GEMINI_KEY_ENV
            ))
        })
    }

    pub fn require_embedding_key(&self) -> Result<&str> {
        self.embedding.api_key.as_deref().ok_or_else(|| {
            RagError::Config(format!(
                "embedding api_key is not set (export {} or RAG_ASSISTANT__EMBEDDING__API_KEY)",
                GEMINI_KEY_ENV
            ))
        })
    }

    pub fn require_web_search_key(&self) -> Result<&str> {
        self.web_search.api_key.as_deref().ok_or_else(|| {
            RagError::Config(format!(
                "web_search api_key is not set (export {} or RAG_ASSISTANT__WEB_SEARCH__API_KEY)",
                TAVILY_KEY_ENV
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.ingestion.segment_size, 300);
        assert_eq!(config.ingestion.overlap, 30);
        assert_eq!(config.assistant.memory_size, 10);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_segment() {
        let mut config = Config::default_config();
        config.ingestion.overlap = 300;
        assert!(config.validate().is_err());

        config.ingestion.splitter = SplitterKind::Fixed;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_score_range() {
        let mut config = Config::default_config();
        config.retrieval.min_score = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[chat]
base_url = "http://localhost:9000"
model = "gemini-2.0-flash"
log_requests = false

[embedding]
provider = "gemini"
base_url = "http://localhost:9000"
model = "text-embedding-004"
dimension = 768
batch_size = 50

[ingestion]
documents = ["a.pdf", "b.pdf"]
splitter = "fixed"
segment_size = 500
overlap = 0
show_progress = false

[retrieval]
max_results = 2
min_score = 0.7

[web_search]
base_url = "http://localhost:9001"
max_results = 5
search_depth = "advanced"

[assistant]
memory_size = 4
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.chat.model, "gemini-2.0-flash");
        assert_eq!(config.chat.temperature, None);
        assert_eq!(config.embedding.provider, EmbeddingProvider::Gemini);
        assert_eq!(config.ingestion.splitter, SplitterKind::Fixed);
        assert_eq!(config.ingestion.documents.len(), 2);
        assert_eq!(config.retrieval.min_score, 0.7);
        assert_eq!(config.assistant.system_message, None);
    }
}
