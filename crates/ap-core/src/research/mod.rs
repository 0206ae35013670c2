//! Research results and the in-memory history of the research panel.

use serde::{Deserialize, Serialize};

/// A cited source, in upstream relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub summary: String,
    pub sources: Vec<Source>,
}

/// Most recent first. A new result replaces every older entry with the
/// exact same query string (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResearchHistory {
    entries: Vec<SearchResult>,
}

impl ResearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: SearchResult) {
        self.entries.retain(|entry| entry.query != result.query);
        self.entries.insert(0, result);
    }

    pub fn entries(&self) -> &[SearchResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.entries.get(index)
    }
}
