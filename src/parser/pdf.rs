// file: src/parser/pdf.rs
// description: PDF text extraction
// reference: https://docs.rs/pdf-extract

use super::DocumentParser;
use crate::error::{RagError, Result};
use tracing::debug;

pub struct PdfDocumentParser;

impl PdfDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for PdfDocumentParser {
    fn parse(&self, bytes: &[u8]) -> Result<String> {
        if !bytes.starts_with(b"%PDF") {
            return Err(RagError::Validation(
                "Input does not start with a PDF header".to_string(),
            ));
        }

        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| RagError::Validation(format!("PDF text extraction failed: {}", e)))?;

        debug!("Extracted {} chars from PDF", text.len());
        Ok(text)
    }
}
