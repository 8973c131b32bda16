// file: src/parser/normalizer.rs
// description: cleanup of text extracted from PDF and plain-text files
// reference: PDF text extraction output

use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, content: &str) -> Result<String> {
        let mut normalized = self.strip_control_chars(content);

        normalized = self.normalize_line_endings(&normalized);
        normalized = self.trim_trailing_whitespace(&normalized);
        normalized = self.collapse_blank_lines(&normalized);

        Ok(normalized.trim().to_string())
    }

    fn strip_control_chars(&self, content: &str) -> String {
        content
            .chars()
            .filter(|&c| c != '\0' && c != '\u{000C}')
            .collect()
    }

    fn normalize_line_endings(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    fn trim_trailing_whitespace(&self, content: &str) -> String {
        content
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collapse_blank_lines(&self, content: &str) -> String {
        BLANK_RUNS.replace_all(content, "\n\n").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_blank_lines() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("one\n\n\n\n\ntwo").unwrap();
        assert_eq!(result, "one\n\ntwo");
    }

    #[test]
    fn test_strips_form_feed_and_trailing_spaces() {
        let normalizer = TextNormalizer::new();
        let result = normalizer
            .normalize("page one   \r\n\u{000C}page two\0  ")
            .unwrap();
        assert_eq!(result, "page one\npage two");
    }
}
