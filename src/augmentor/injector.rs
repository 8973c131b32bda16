// file: src/augmentor/injector.rs
// description: appends retrieved contents to the user message

use crate::models::{ChatMessage, Content};

pub const PROMPT_TEMPLATE: &str =
    "{{user_message}}\n\nAnswer using the following information:\n{{contents}}";

#[derive(Debug, Clone, Default)]
pub struct ContentInjector;

impl ContentInjector {
    pub fn new() -> Self {
        Self
    }

    pub fn inject(&self, contents: &[Content], user_message: &str) -> ChatMessage {
        if contents.is_empty() {
            return ChatMessage::user(user_message);
        }

        let joined = contents
            .iter()
            .map(Content::text)
            .collect::<Vec<_>>()
            .join("\n\n");

        ChatMessage::user(
            PROMPT_TEMPLATE
                .replace("{{user_message}}", user_message)
                .replace("{{contents}}", &joined),
        )
    }
}
