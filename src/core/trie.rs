// --- File: src/core/trie.rs
use crate::core::types::Word;
use std::collections::{BTreeMap, VecDeque};

/// Number of suggestions returned when the caller does not ask for a count.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    /// Ordered so that a level-order walk emits siblings lexicographically.
    children: BTreeMap<char, NodeId>,
    word: Option<Word>,
}

impl Node {
    fn new() -> Self {
        Self { children: BTreeMap::new(), word: None }
    }
}

/// An immutable, arena-allocated trie over the vocabulary.
///
/// A breadth-first walk below the prefix node visits words by ascending
/// length, and within one depth in code-point order, which is exactly the
/// autocomplete ranking. The walk therefore stops as soon as `limit` words
/// have been seen instead of collecting and sorting the whole subtree.
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    nodes: Vec<Node>,
    len: usize,
}

impl PrefixIndex {
    /// Builds the index. Duplicate words are stored once.
    /// O(n·k) where k is the average word length.
    pub fn build<I>(words: I) -> Self
    where
        I: IntoIterator<Item = Word>,
    {
        let mut index = Self { nodes: vec![Node::new()], len: 0 };
        for word in words {
            index.insert(word);
        }
        index
    }

    fn insert(&mut self, word: Word) {
        let mut node_idx = 0;
        for c in word.as_str().chars() {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&c) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(Node::new());
                self.nodes[node_idx].children.insert(c, new_node_id);
                new_node_id
            };
            node_idx = next_idx;
        }
        if self.nodes[node_idx].word.is_none() {
            self.nodes[node_idx].word = Some(word);
            self.len += 1;
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find_node(word)
            .map_or(false, |idx| self.nodes[idx].word.is_some())
    }

    fn find_node(&self, prefix: &str) -> Option<NodeId> {
        let mut node_idx = 0;
        for c in prefix.chars().flat_map(char::to_lowercase) {
            node_idx = *self.nodes[node_idx].children.get(&c)?;
        }
        Some(node_idx)
    }

    /// Up to `limit` words starting with `prefix`, shortest first, ties in
    /// code-point order. An empty prefix yields nothing.
    /// O(p + S) where S is the number of nodes visited before `limit` hits.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Word> {
        if prefix.is_empty() || limit == 0 {
            return vec![];
        }
        let Some(start) = self.find_node(prefix) else {
            return vec![];
        };

        let mut results = Vec::with_capacity(limit.min(self.len));
        let mut queue = VecDeque::from([start]);
        while let Some(node_idx) = queue.pop_front() {
            let node = &self.nodes[node_idx];
            if let Some(word) = &node.word {
                results.push(word.clone());
                if results.len() == limit {
                    break;
                }
            }
            queue.extend(node.children.values().copied());
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(words: &[&str]) -> PrefixIndex {
        PrefixIndex::build(words.iter().map(|w| Word::from_normalized(w).unwrap()))
    }

    fn strings(words: Vec<Word>) -> Vec<String> {
        words.into_iter().map(Word::into_string).collect()
    }

    #[test]
    fn shorter_words_rank_first() {
        let idx = index(&["katter", "katt", "katte"]);
        assert_eq!(strings(idx.suggest("katt", 10)), ["katt", "katte", "katter"]);
    }

    #[test]
    fn equal_lengths_tie_break_lexicographically() {
        let idx = index(&["kattunge", "kattene", "kattane", "katta", "katte", "kattb"]);
        assert_eq!(
            strings(idx.suggest("kat", 10)),
            ["katta", "kattb", "katte", "kattane", "kattene", "kattunge"]
        );
    }

    #[test]
    fn ordering_does_not_follow_insertion_order() {
        let forward = index(&["bål", "bad", "bær", "bok", "bøk"]);
        let backward = index(&["bøk", "bok", "bær", "bad", "bål"]);
        assert_eq!(forward.suggest("b", 10), backward.suggest("b", 10));
        // Code-point order: a < o < å < æ < ø
        assert_eq!(strings(forward.suggest("b", 10)), ["bad", "bok", "bål", "bær", "bøk"]);
    }

    #[test]
    fn empty_prefix_returns_nothing() {
        let idx = index(&["a", "b"]);
        for n in [0, 1, 10, 1000] {
            assert!(idx.suggest("", n).is_empty());
        }
    }

    #[test]
    fn unmatched_prefix_returns_nothing() {
        let idx = index(&["katt"]);
        assert!(idx.suggest("hund", 10).is_empty());
        assert!(idx.suggest("katten", 10).is_empty());
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let idx = index(&["øl", "ølen"]);
        assert_eq!(strings(idx.suggest("ØL", 10)), ["øl", "ølen"]);
    }

    #[test]
    fn limit_truncates_and_larger_limit_extends() {
        let words: Vec<String> = (0..200).map(|i| format!("ord{i}")).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let idx = index(&refs);

        let mut previous = Vec::new();
        for limit in [0, 1, 3, 10, 50, 500] {
            let current = idx.suggest("ord", limit);
            assert!(current.len() <= limit);
            assert!(current.starts_with(&previous));
            assert!(current.iter().all(|w| w.as_str().starts_with("ord")));
            previous = current;
        }
        assert_eq!(previous.len(), 200);
    }

    #[test]
    fn results_match_a_full_sort() {
        let words = ["a", "ab", "abc", "abd", "b", "ba", "aa", "aaa", "ac", "abcd"];
        let idx = index(&words);
        let mut expected: Vec<&str> = words.iter().copied().filter(|w| w.starts_with('a')).collect();
        expected.sort_by(|x, y| x.chars().count().cmp(&y.chars().count()).then(x.cmp(y)));
        assert_eq!(strings(idx.suggest("a", 100)), expected);
    }

    #[test]
    fn duplicates_are_stored_once() {
        let idx = index(&["katt", "katt", "hund"]);
        assert_eq!(idx.len(), 2);
        assert!(idx.contains("katt"));
        assert!(!idx.contains("kat"));
        assert_eq!(idx.suggest("katt", 10).len(), 1);
    }
}
