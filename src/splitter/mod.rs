// file: src/splitter/mod.rs
// description: document splitters producing text segments for embedding
// reference: internal module structure

pub mod fixed;
pub mod recursive;

pub use fixed::FixedSizeSplitter;
pub use recursive::RecursiveSplitter;

use crate::config::{IngestionConfig, SplitterKind};
use crate::error::Result;
use crate::models::{Document, TextSegment};

pub trait DocumentSplitter: Send + Sync {
    fn split(&self, document: &Document) -> Vec<TextSegment>;

    fn split_all(&self, documents: &[Document]) -> Vec<TextSegment> {
        documents.iter().flat_map(|doc| self.split(doc)).collect()
    }
}

/// Builds the splitter selected in the ingestion configuration.
pub fn from_config(config: &IngestionConfig) -> Result<Box<dyn DocumentSplitter>> {
    Ok(match config.splitter {
        SplitterKind::Fixed => Box::new(FixedSizeSplitter::new(config.segment_size)?),
        SplitterKind::Recursive => {
            Box::new(RecursiveSplitter::new(config.segment_size, config.overlap)?)
        }
    })
}
