// file: src/parser/mod.rs
// description: document parsing and loading from the file system
// reference: internal module structure

pub mod normalizer;
pub mod pdf;
pub mod text;

pub use normalizer::TextNormalizer;
pub use pdf::PdfDocumentParser;
pub use text::TextDocumentParser;

use crate::error::{RagError, Result};
use crate::models::Document;
use std::path::Path;
use tracing::info;

/// Turns raw file bytes into text.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<String>;
}

/// Reads `path`, extracts its text with `parser` and normalizes it.
///
/// Every failure is reported as [`RagError::DocumentLoad`] naming the path.
pub fn load_document(path: &Path, parser: &dyn DocumentParser) -> Result<Document> {
    info!("Loading document: {}", path.display());

    let bytes = std::fs::read(path).map_err(|e| RagError::document_load(path, e))?;

    let raw = parser
        .parse(&bytes)
        .map_err(|e| RagError::document_load(path, e))?;

    let text = TextNormalizer::new()
        .normalize(&raw)
        .map_err(|e| RagError::document_load(path, e))?;

    if text.is_empty() {
        return Err(RagError::document_load(path, "no text could be extracted"));
    }

    Ok(Document::from_file(path, text))
}

/// Picks a parser from the file extension: `.pdf` or anything else as text.
pub fn parser_for(path: &Path) -> Box<dyn DocumentParser> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Box::new(PdfDocumentParser::new()),
        _ => Box::new(TextDocumentParser::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_text_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "REST principles\n\n\n\nstatelessness  ").unwrap();

        let doc = load_document(file.path(), &TextDocumentParser::new()).unwrap();
        assert_eq!(doc.text, "REST principles\n\nstatelessness");
        assert!(doc.file_name().is_some());
    }

    #[test]
    fn test_missing_file_is_document_load_error() {
        let err = load_document(Path::new("does/not/exist.pdf"), &PdfDocumentParser::new())
            .unwrap_err();
        match err {
            RagError::DocumentLoad { path, .. } => {
                assert_eq!(path, Path::new("does/not/exist.pdf"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_document_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  \n\n  ").unwrap();

        let err = load_document(file.path(), &TextDocumentParser::new()).unwrap_err();
        assert!(matches!(err, RagError::DocumentLoad { .. }));
    }

    #[test]
    fn test_parser_for_extension() {
        let parser = parser_for(Path::new("notes.txt"));
        assert_eq!(parser.parse(b"hello").unwrap(), "hello");
    }
}
