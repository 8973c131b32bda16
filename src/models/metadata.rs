// file: src/models/metadata.rs
// description: string key/value metadata attached to documents and segments
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FILE_NAME: &str = "file_name";
pub const ABSOLUTE_DIRECTORY_PATH: &str = "absolute_directory_path";
pub const CONTENT_HASH: &str = "content_hash";
pub const LOADED_AT: &str = "loaded_at";
pub const INDEX: &str = "index";
pub const URL: &str = "url";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.put(key, value);
        self
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let metadata = Metadata::new().with(FILE_NAME, "a.pdf").with(INDEX, 3);
        assert_eq!(metadata.get(FILE_NAME), Some("a.pdf"));
        assert_eq!(metadata.get(INDEX), Some("3"));
        assert_eq!(metadata.get(URL), None);
        assert_eq!(metadata.len(), 2);
    }
}
