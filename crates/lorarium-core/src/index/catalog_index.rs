//! In-memory catalog index with substring search, token-prefix search,
//! and ordered autosuggest.

use super::tokenize::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Counts describing the current index contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Indexed corpus entries.
    pub entries: usize,
    /// Distinct vocabulary tokens.
    pub tokens: usize,
    /// Total posting-list entries across all tokens.
    pub postings: usize,
}

/// In-memory full-text index over one flat, ordered string collection.
///
/// The index owns no persistence and observes no changes on its own:
/// the caller re-invokes [`build`](CatalogIndex::build) whenever its
/// underlying collection mutates, and every query result is a list of
/// positions into the caller's own ordered collection.
///
/// A never-built index answers every query with an empty result.
///
/// Not internally synchronized. A concurrent host should build a fresh
/// instance off to the side and publish it via one atomic handle swap
/// so readers never observe a partially built index.
///
/// # Examples
///
/// ```
/// use lorarium_catalog::CatalogIndex;
///
/// let mut index = CatalogIndex::new();
/// index.build(&["red car", "blue truck", "green car"]);
///
/// assert_eq!(index.search("car"), vec![0, 2]);
/// assert_eq!(index.suggest("c", 10), vec!["car".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    /// Case-folded corpus entries, in caller order.
    entries: Vec<String>,
    /// Vocabulary in first-occurrence order across the corpus.
    vocab: Vec<String>,
    /// Token → position in `vocab`.
    token_ids: HashMap<String, u32>,
    /// Posting list per vocabulary token, parallel to `vocab`.
    /// Ascending and deduplicated by construction.
    postings: Vec<Vec<u32>>,
}

impl CatalogIndex {
    /// Empty (never-built) index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all index state with a fresh build over `corpus`.
    ///
    /// Cost is linear in total token count. Prior state is discarded
    /// wholesale — there is no merging of old and new corpora.
    pub fn build<S: AsRef<str>>(&mut self, corpus: &[S]) {
        self.entries.clear();
        self.vocab.clear();
        self.token_ids.clear();
        self.postings.clear();

        for (doc_id, entry) in corpus.iter().enumerate() {
            let doc_id = doc_id as u32;
            let lowered = entry.as_ref().to_lowercase();

            for token in tokenize(&lowered) {
                let id = match self.token_ids.get(&token) {
                    Some(&id) => id,
                    None => {
                        let id = self.vocab.len() as u32;
                        self.token_ids.insert(token.clone(), id);
                        self.vocab.push(token);
                        self.postings.push(Vec::new());
                        id
                    }
                };
                let list = &mut self.postings[id as usize];
                // Entries arrive in document order; one check dedups.
                if list.last() != Some(&doc_id) {
                    list.push(doc_id);
                }
            }
            self.entries.push(lowered);
        }

        debug!(
            "Built catalog index: {} entries, {} distinct tokens",
            self.entries.len(),
            self.vocab.len()
        );
    }

    /// Every entry whose text contains `query` as a substring, case
    /// folded, in ascending index order. An empty query matches
    /// nothing.
    pub fn search(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Every entry containing at least one token that starts with
    /// `query`, case folded, in ascending index order. Unlike
    /// [`search`](CatalogIndex::search) this is token-bounded: a match
    /// must begin at a token start. An empty query matches nothing.
    pub fn search_prefix(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }
        let prefix = query.to_lowercase();

        let mut hits: Vec<u32> = Vec::new();
        for (id, token) in self.vocab.iter().enumerate() {
            if token.starts_with(&prefix) {
                hits.extend_from_slice(&self.postings[id]);
            }
        }
        hits.sort_unstable();
        hits.dedup();

        hits.into_iter().map(|id| id as usize).collect()
    }

    /// Up to `limit` distinct vocabulary tokens starting with `prefix`,
    /// ordered by first occurrence across the corpus. The ordering is
    /// stable and deterministic — not alphabetical, not frequency
    /// ranked. A zero limit yields nothing.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        if limit == 0 {
            return Vec::new();
        }
        let prefix = prefix.to_lowercase();

        self.vocab
            .iter()
            .filter(|token| token.starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Counts for the current build.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.entries.len(),
            tokens: self.vocab.len(),
            postings: self.postings.iter().map(Vec::len).sum(),
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(corpus: &[&str]) -> CatalogIndex {
        let mut index = CatalogIndex::new();
        index.build(corpus);
        index
    }

    #[test]
    fn test_search_substring_anywhere() {
        let index = built(&["red car", "blue truck", "green car"]);
        assert_eq!(index.search("car"), vec![0, 2]);
        assert_eq!(index.search("ruck"), vec![1]);
    }

    #[test]
    fn test_search_is_case_folded() {
        let index = built(&["Red Car", "BLUE TRUCK"]);
        assert_eq!(index.search("RED"), vec![0]);
        assert_eq!(index.search("truck"), vec![1]);
    }

    #[test]
    fn test_search_empty_query_matches_nothing() {
        let index = built(&["red car"]);
        assert!(index.search("").is_empty());
    }

    #[test]
    fn test_search_prefix_is_token_bounded() {
        let index = built(&["Fright Night", "Halloween Nightmare", "Nightmare Fuel"]);
        assert_eq!(index.search_prefix("night"), vec![0, 1, 2]);
        // "ight" occurs inside tokens but starts none of them.
        assert!(index.search_prefix("ight").is_empty());
        // Substring search still finds it.
        assert_eq!(index.search("ight"), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_prefix_dedups_documents() {
        let index = built(&["night night night"]);
        assert_eq!(index.search_prefix("night"), vec![0]);
    }

    #[test]
    fn test_suggest_orders_by_first_occurrence() {
        let index = built(&["zeta zulu", "zach zeta"]);
        // Not alphabetical: corpus-first-occurrence order.
        assert_eq!(
            index.suggest("z", 10),
            vec!["zeta".to_string(), "zulu".to_string(), "zach".to_string()]
        );
    }

    #[test]
    fn test_suggest_respects_limit() {
        let index = built(&["red car", "blue truck", "green car"]);
        let suggestions = index.suggest("c", 10);
        assert!(suggestions.contains(&"car".to_string()));
        assert!(index.suggest("c", 0).is_empty());
        assert_eq!(index.suggest("", 2).len(), 2);
    }

    #[test]
    fn test_rebuild_discards_prior_state() {
        let mut index = CatalogIndex::new();
        index.build(&["alpha beta"]);
        assert_eq!(index.search("alpha"), vec![0]);

        index.build(&["gamma delta"]);
        assert!(index.search("alpha").is_empty());
        assert!(index.suggest("a", 10).is_empty());
        assert_eq!(index.search("gamma"), vec![0]);
        assert_eq!(index.stats().entries, 1);
    }

    #[test]
    fn test_unbuilt_index_answers_empty() {
        let index = CatalogIndex::new();
        assert!(index.search("anything").is_empty());
        assert!(index.search_prefix("any").is_empty());
        assert!(index.suggest("a", 10).is_empty());
        assert!(index.is_empty());
        assert_eq!(index.stats(), IndexStats { entries: 0, tokens: 0, postings: 0 });
    }

    #[test]
    fn test_stats_counts() {
        let index = built(&["red car", "blue truck", "green car"]);
        let stats = index.stats();
        assert_eq!(stats.entries, 3);
        // red, car, blue, truck, green
        assert_eq!(stats.tokens, 5);
        assert_eq!(stats.postings, 6);
    }

    #[test]
    fn test_stats_wire_shape() {
        let index = built(&["red car"]);
        let json = serde_json::to_value(index.stats()).unwrap();
        assert_eq!(json["entries"], 1);
        assert_eq!(json["tokens"], 2);
    }
}
