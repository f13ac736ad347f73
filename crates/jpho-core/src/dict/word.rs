use crate::trie::{Trie, TrieNode};

use super::Vocabulary;

/// Set of known words, stored as existence markers in a trie.
#[derive(Default)]
pub struct WordDictionary {
    trie: Trie<()>,
}

impl WordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        let mut dict = Self::new();
        for word in words {
            dict.insert(word.as_ref());
        }
        dict
    }

    /// Mark `word` as known. Empty words are ignored.
    pub fn insert(&mut self, word: &str) {
        if !word.is_empty() {
            self.trie.insert(word.chars(), ());
        }
    }

    pub fn root(&self) -> &TrieNode<()> {
        self.trie.root()
    }

    pub fn trie(&self) -> &Trie<()> {
        &self.trie
    }

    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.trie.get(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

impl Vocabulary for WordDictionary {
    fn match_len(&self, chars: &[char], start: usize) -> Option<usize> {
        self.trie.longest_match(chars, start).map(|(len, _)| len)
    }

    fn compound_len(&self, stem: &[char], tail: &[char]) -> Option<usize> {
        self.trie.extend_match(stem, tail)
    }
}
