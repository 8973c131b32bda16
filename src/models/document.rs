// file: src/models/document.rs
// description: loaded document model with content hash and source metadata
// reference: internal data structures

use super::metadata::{self, Metadata};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let metadata = Metadata::new()
            .with(metadata::CONTENT_HASH, Self::compute_hash(&text))
            .with(metadata::LOADED_AT, Utc::now().to_rfc3339());

        Self { text, metadata }
    }

    /// Builds a document for a file on disk, recording its name and directory.
    pub fn from_file(path: &Path, text: impl Into<String>) -> Self {
        let mut document = Self::new(text);

        if let Some(name) = path.file_name() {
            document
                .metadata
                .put(metadata::FILE_NAME, name.to_string_lossy());
        }

        let directory = std::fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        if let Some(directory) = directory {
            document
                .metadata
                .put(metadata::ABSOLUTE_DIRECTORY_PATH, directory.display());
        }

        document
    }

    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get(metadata::FILE_NAME)
    }

    pub fn content_hash(&self) -> Option<&str> {
        self.metadata.get(metadata::CONTENT_HASH)
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::from_file(Path::new("/path/to/file.pdf"), "Fine-tuning RAG");

        assert_eq!(doc.text, "Fine-tuning RAG");
        assert_eq!(doc.file_name(), Some("file.pdf"));
        assert_eq!(doc.content_hash().map(str::len), Some(64));
        assert!(doc.metadata.contains_key(metadata::LOADED_AT));
    }

    #[test]
    fn test_hash_consistency() {
        let content = "Test content";
        let hash1 = Document::compute_hash(content);
        let hash2 = Document::compute_hash(content);
        assert_eq!(hash1, hash2);
    }
}
