// file: src/augmentor/aggregator.rs
// description: merges the results of several retrievers with reciprocal rank fusion

use crate::models::Content;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_RRF_K: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct ContentAggregator {
    k: f64,
}

impl ContentAggregator {
    pub fn new() -> Self {
        Self { k: DEFAULT_RRF_K }
    }

    /// A single list passes through unchanged. Several lists are fused with
    /// `score = sum(1 / (k + rank))`; identical texts are merged.
    pub fn aggregate(&self, results: Vec<Vec<Content>>) -> Vec<Content> {
        let mut lists: Vec<Vec<Content>> = results.into_iter().filter(|l| !l.is_empty()).collect();

        match lists.len() {
            0 => Vec::new(),
            1 => lists.remove(0),
            _ => self.fuse(lists),
        }
    }

    fn fuse(&self, lists: Vec<Vec<Content>>) -> Vec<Content> {
        let mut scores: HashMap<String, f64> = HashMap::new();
        let mut unique: Vec<Content> = Vec::new();

        for list in lists {
            for (rank, content) in list.into_iter().enumerate() {
                let score = 1.0 / (self.k + rank as f64 + 1.0);
                match scores.get_mut(content.text()) {
                    Some(total) => *total += score,
                    None => {
                        scores.insert(content.text().to_string(), score);
                        unique.push(content);
                    }
                }
            }
        }

        let mut ranked: Vec<(f64, Content)> = unique
            .into_iter()
            .map(|c| (scores.get(c.text()).copied().unwrap_or_default(), c))
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        ranked.into_iter().map(|(_, c)| c).collect()
    }
}

impl Default for ContentAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(texts: &[&str]) -> Vec<Content> {
        texts.iter().map(|t| Content::from_text(*t)).collect()
    }

    fn texts(contents: &[Content]) -> Vec<&str> {
        contents.iter().map(Content::text).collect()
    }

    #[test]
    fn test_single_list_passes_through() {
        let aggregator = ContentAggregator::new();
        let result = aggregator.aggregate(vec![contents(&["b", "a"]), vec![]]);
        assert_eq!(texts(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_shared_content_ranks_first() {
        let aggregator = ContentAggregator::new();
        let result = aggregator.aggregate(vec![
            contents(&["pdf-1", "shared"]),
            contents(&["web-1", "shared"]),
        ]);
        assert_eq!(texts(&result), vec!["shared", "pdf-1", "web-1"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ContentAggregator::new().aggregate(vec![]).is_empty());
    }
}
