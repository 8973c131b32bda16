// file: src/splitter/fixed.rs
// description: fixed-size character splitter without overlap

use super::DocumentSplitter;
use crate::error::{RagError, Result};
use crate::models::{Document, TextSegment};

/// Cuts text into consecutive runs of `segment_size` characters.
#[derive(Debug, Clone)]
pub struct FixedSizeSplitter {
    segment_size: usize,
}

impl FixedSizeSplitter {
    pub fn new(segment_size: usize) -> Result<Self> {
        if segment_size == 0 {
            return Err(RagError::Validation(
                "segment_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self { segment_size })
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.segment_size)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

impl DocumentSplitter for FixedSizeSplitter {
    fn split(&self, document: &Document) -> Vec<TextSegment> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| TextSegment::from_document(document, text, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(FixedSizeSplitter::new(0).is_err());
    }

    #[test]
    fn test_segments_cover_input() {
        let text = "abcdefghij".repeat(105);
        let splitter = FixedSizeSplitter::new(500).unwrap();
        let segments = splitter.split(&Document::new(text.clone()));

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].char_len(), 500);
        assert_eq!(segments[1].char_len(), 500);
        assert_eq!(segments[2].char_len(), 50);

        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
        assert_eq!(segments[2].index(), Some(2));
    }

    #[test]
    fn test_multibyte_text() {
        let text = "réglage fin été";
        let splitter = FixedSizeSplitter::new(4).unwrap();
        let segments = splitter.split(&Document::new(text));

        assert!(segments.iter().all(|s| s.char_len() <= 4));
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_empty_document() {
        let splitter = FixedSizeSplitter::new(10).unwrap();
        assert!(splitter.split(&Document::new("")).is_empty());
    }
}
