// file: src/chat/memory.rs
// description: sliding window of the most recent chat messages

use crate::models::ChatMessage;
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_MAX_MESSAGES: usize = 10;

/// Keeps at most `max_messages` messages. A system message counts toward the
/// limit but is never evicted; adding a different one replaces it.
#[derive(Debug, Clone)]
pub struct MessageWindowChatMemory {
    max_messages: usize,
    messages: VecDeque<ChatMessage>,
}

impl MessageWindowChatMemory {
    pub fn with_max_messages(max_messages: usize) -> Self {
        Self {
            max_messages: max_messages.max(1),
            messages: VecDeque::new(),
        }
    }

    pub fn add(&mut self, message: ChatMessage) {
        if message.is_system() {
            if let Some(pos) = self.messages.iter().position(ChatMessage::is_system) {
                if self.messages[pos] == message {
                    return;
                }
                self.messages.remove(pos);
            }
            self.messages.push_front(message);
        } else {
            self.messages.push_back(message);
        }
        self.evict();
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    fn evict(&mut self) {
        while self.messages.len() > self.max_messages {
            let Some(pos) = self.messages.iter().position(|m| !m.is_system()) else {
                break;
            };
            if let Some(evicted) = self.messages.remove(pos) {
                debug!("Evicted {:?} message from chat memory", evicted.role);
            }
        }
    }
}

impl Default for MessageWindowChatMemory {
    fn default() -> Self {
        Self::with_max_messages(DEFAULT_MAX_MESSAGES)
    }
}
