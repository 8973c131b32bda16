// file: src/parser/text.rs
// description: plain text document parser

use super::DocumentParser;
use crate::error::Result;

pub struct TextDocumentParser;

impl TextDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for TextDocumentParser {
    fn parse(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
