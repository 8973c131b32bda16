// file: src/chat/mod.rs
// description: chat model abstraction and conversation memory
// reference: internal module structure

pub mod gemini;
pub mod memory;

pub use gemini::GeminiChatModel;
pub use memory::MessageWindowChatMemory;

use crate::error::Result;
use crate::models::{ChatMessage, ChatResponse};
use async_trait::async_trait;

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;

    /// Convenience for single-turn prompts such as routing decisions.
    async fn ask(&self, prompt: &str) -> Result<String> {
        let response = self.chat(&[ChatMessage::user(prompt)]).await?;
        Ok(response.text)
    }
}
