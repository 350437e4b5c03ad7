//! Per-conversation search sessions.
//!
//! Each conversation keeps at most one candidate list: the result of its
//! latest search. A play selection resolves against that list, and a new
//! search replaces it wholesale.

use dashmap::DashMap;
use encore_catalog::SearchResult;

/// Thread-safe map from conversation id to its latest candidate list.
#[derive(Debug, Default)]
pub struct SessionStore {
    results: DashMap<String, Vec<SearchResult>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the candidate list for a conversation, replacing any prior one.
    pub fn remember(&self, conversation: &str, results: Vec<SearchResult>) {
        self.results.insert(conversation.to_string(), results);
    }

    /// Resolve a 1-based selection against the conversation's stored list.
    ///
    /// Returns `None` when the conversation has no stored list or the index
    /// falls outside it.
    pub fn select(&self, conversation: &str, index: usize) -> Option<SearchResult> {
        if index == 0 {
            return None;
        }
        self.results
            .get(conversation)
            .and_then(|entry| entry.get(index - 1).cloned())
    }

    /// Number of candidates stored for a conversation, zero if none.
    pub fn stored_len(&self, conversation: &str) -> usize {
        self.results
            .get(conversation)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ordinal: u32, title: &str) -> SearchResult {
        SearchResult {
            ordinal,
            title: title.to_string(),
            singer: "Artist".to_string(),
        }
    }

    #[test]
    fn test_select_within_bounds() {
        let store = SessionStore::new();
        store.remember("room-1", vec![sample(1, "First"), sample(2, "Second")]);

        assert_eq!(store.select("room-1", 1).map(|s| s.title), Some("First".to_string()));
        assert_eq!(store.select("room-1", 2).map(|s| s.title), Some("Second".to_string()));
        assert_eq!(store.stored_len("room-1"), 2);
    }

    #[test]
    fn test_select_out_of_bounds() {
        let store = SessionStore::new();
        store.remember("room-1", vec![sample(1, "Only")]);

        assert_eq!(store.select("room-1", 0), None);
        assert_eq!(store.select("room-1", 2), None);
    }

    #[test]
    fn test_select_without_session() {
        let store = SessionStore::new();
        assert_eq!(store.select("room-1", 1), None);
        assert_eq!(store.stored_len("room-1"), 0);
    }

    #[test]
    fn test_new_search_replaces_list() {
        let store = SessionStore::new();
        store.remember("room-1", vec![sample(1, "Old A"), sample(2, "Old B"), sample(3, "Old C")]);
        store.remember("room-1", vec![sample(1, "New")]);

        assert_eq!(store.stored_len("room-1"), 1);
        assert_eq!(store.select("room-1", 1).map(|s| s.title), Some("New".to_string()));
        assert_eq!(store.select("room-1", 3), None);
    }

    #[test]
    fn test_sessions_are_per_conversation() {
        let store = SessionStore::new();
        store.remember("room-1", vec![sample(1, "A")]);
        store.remember("room-2", vec![sample(1, "B")]);

        assert_eq!(store.select("room-1", 1).map(|s| s.title), Some("A".to_string()));
        assert_eq!(store.select("room-2", 1).map(|s| s.title), Some("B".to_string()));
    }
}
