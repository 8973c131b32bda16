// file: src/splitter/recursive.rs
// description: hierarchical splitter (paragraph, line, sentence, word, character) with overlap
// reference: text chunking with overlap for embedding

use super::DocumentSplitter;
use crate::error::{RagError, Result};
use crate::models::{Document, TextSegment};
use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*\n\s*").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Paragraph,
    Line,
    Sentence,
    Word,
    Character,
}

impl Level {
    fn next(self) -> Self {
        match self {
            Level::Paragraph => Level::Line,
            Level::Line => Level::Sentence,
            Level::Sentence => Level::Word,
            Level::Word | Level::Character => Level::Character,
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            Level::Paragraph => "\n\n",
            Level::Line => "\n",
            Level::Sentence | Level::Word => " ",
            Level::Character => "",
        }
    }
}

/// A piece of text no longer than the segment limit, with the separator
/// that precedes it in the original text.
#[derive(Debug)]
struct Part {
    text: String,
    joiner: &'static str,
}

/// Splits by paragraphs first and falls back to finer units only for
/// pieces that exceed `max_segment_size` characters.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    max_segment_size: usize,
    max_overlap: usize,
}

impl RecursiveSplitter {
    pub fn new(max_segment_size: usize, max_overlap: usize) -> Result<Self> {
        if max_segment_size == 0 {
            return Err(RagError::Validation(
                "max_segment_size must be greater than 0".to_string(),
            ));
        }
        if max_overlap >= max_segment_size {
            return Err(RagError::Validation(format!(
                "max_overlap ({}) must be smaller than max_segment_size ({})",
                max_overlap, max_segment_size
            )));
        }
        Ok(Self {
            max_segment_size,
            max_overlap,
        })
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut parts = Vec::new();
        self.atomize(text.trim(), Level::Paragraph, "", &mut parts);
        self.pack(parts)
    }

    fn atomize(&self, text: &str, level: Level, joiner: &'static str, out: &mut Vec<Part>) {
        if text.is_empty() {
            return;
        }

        if char_len(text) <= self.max_segment_size {
            out.push(Part {
                text: text.to_string(),
                joiner,
            });
            return;
        }

        if level == Level::Character {
            let chars: Vec<char> = text.chars().collect();
            for (i, chunk) in chars.chunks(self.max_segment_size).enumerate() {
                out.push(Part {
                    text: chunk.iter().collect(),
                    joiner: if i == 0 { joiner } else { Level::Character.joiner() },
                });
            }
            return;
        }

        let pieces = split_at_level(text, level);
        for (i, piece) in pieces.into_iter().enumerate() {
            let piece_joiner = if i == 0 { joiner } else { level.joiner() };
            self.atomize(piece, level.next(), piece_joiner, out);
        }
    }

    fn pack(&self, parts: Vec<Part>) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for part in parts {
            let part_len = char_len(&part.text);

            if current.is_empty() {
                current = part.text;
                current_len = part_len;
                continue;
            }

            let joiner_len = char_len(part.joiner);
            if current_len + joiner_len + part_len <= self.max_segment_size {
                current.push_str(part.joiner);
                current.push_str(&part.text);
                current_len += joiner_len + part_len;
                continue;
            }

            let separator = if part.joiner.is_empty() { "" } else { " " };
            let budget = self
                .max_segment_size
                .saturating_sub(part_len + separator.len());
            let overlap = overlap_tail(&current, self.max_overlap.min(budget));

            segments.push(std::mem::take(&mut current));

            if overlap.is_empty() {
                current = part.text;
                current_len = part_len;
            } else {
                current_len = char_len(&overlap) + separator.len() + part_len;
                current = format!("{}{}{}", overlap, separator, part.text);
            }
        }

        if !current.is_empty() {
            segments.push(current);
        }

        segments
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl DocumentSplitter for RecursiveSplitter {
    fn split(&self, document: &Document) -> Vec<TextSegment> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| TextSegment::from_document(document, text, index))
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_at_level(text: &str, level: Level) -> Vec<&str> {
    let pieces: Vec<&str> = match level {
        Level::Paragraph => PARAGRAPH_BREAK.split(text).collect(),
        Level::Line => LINE_BREAK.split(text).collect(),
        Level::Sentence => split_sentences(text),
        Level::Word => text.split_whitespace().collect(),
        Level::Character => vec![text],
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    sentences.push(&text[start..next_idx]);
                    start = next_idx;
                }
            } else {
                sentences.push(&text[start..idx + c.len_utf8()]);
                start = text.len();
            }
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Last `limit` characters of `text`, moved forward to a word boundary.
fn overlap_tail(text: &str, limit: usize) -> String {
    if limit == 0 {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= limit {
        return text.trim().to_string();
    }

    let mut cut = chars.len() - limit;
    if !chars[cut - 1].is_whitespace() {
        while cut < chars.len() && !chars[cut].is_whitespace() {
            cut += 1;
        }
    }

    chars[cut..].iter().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(count: usize) -> String {
        (0..count)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(RecursiveSplitter::new(0, 0).is_err());
        assert!(RecursiveSplitter::new(30, 30).is_err());
        assert!(RecursiveSplitter::new(300, 30).is_ok());
    }

    #[test]
    fn test_short_text_single_segment() {
        let splitter = RecursiveSplitter::new(300, 30).unwrap();
        let segments = splitter.split_text("  Retrieval augmented generation.  ");
        assert_eq!(segments, vec!["Retrieval augmented generation.".to_string()]);
    }

    #[test]
    fn test_paragraphs_packed_together_when_they_fit() {
        let splitter = RecursiveSplitter::new(40, 0).unwrap();
        let segments = splitter.split_text("First paragraph.\n\nSecond one.\n\nThird paragraph here.");
        assert_eq!(
            segments,
            vec![
                "First paragraph.\n\nSecond one.".to_string(),
                "Third paragraph here.".to_string()
            ]
        );
    }

    #[test]
    fn test_no_segment_exceeds_limit() {
        let text = format!(
            "{}\n\n{}. {}! {}\n{}",
            words(80),
            words(30),
            words(12),
            "x".repeat(700),
            words(5)
        );
        let splitter = RecursiveSplitter::new(300, 30).unwrap();
        let segments = splitter.split_text(&text);

        assert!(segments.len() > 3);
        for segment in &segments {
            assert!(char_len(segment) <= 300, "segment too long: {}", char_len(segment));
        }
    }

    #[test]
    fn test_consecutive_segments_overlap() {
        let splitter = RecursiveSplitter::new(50, 15).unwrap();
        let segments = splitter.split_text(&words(60));

        assert!(segments.len() > 2);
        for pair in segments.windows(2) {
            let first_word = pair[1].split_whitespace().next().unwrap();
            let previous: Vec<&str> = pair[0].split_whitespace().collect();
            assert!(
                previous.contains(&first_word),
                "{:?} does not start with overlap from {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_without_overlap_words_are_preserved() {
        let text = words(40);
        let splitter = RecursiveSplitter::new(25, 0).unwrap();
        let segments = splitter.split_text(&text);

        let rejoined = segments.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("One. Two? Three!Four. ");
        assert_eq!(sentences, vec!["One.", " Two?", " Three!Four.", " "]);
    }

    #[test]
    fn test_overlap_tail_word_boundary() {
        assert_eq!(overlap_tail("alpha beta gamma", 8), "gamma");
        assert_eq!(overlap_tail("alpha beta gamma", 10), "beta gamma");
        assert_eq!(overlap_tail("alpha", 0), "");
    }

    #[test]
    fn test_segment_metadata_index() {
        let splitter = RecursiveSplitter::new(20, 0).unwrap();
        let doc = Document::new("alpha beta gamma delta epsilon zeta eta theta");
        let segments = splitter.split(&doc);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index(), Some(i));
        }
    }
}
