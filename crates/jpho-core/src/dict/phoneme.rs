use crate::trie::{Trie, TrieNode};

use super::{PhonemeLookup, Vocabulary};

/// Surface text → phonetic value.
#[derive(Default)]
pub struct PhonemeDictionary {
    trie: Trie<String>,
}

impl PhonemeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut dict = Self::new();
        for (key, value) in entries {
            dict.insert(key.as_ref(), value);
        }
        dict
    }

    /// Insert or replace the phonetic value for `key` (last write wins).
    ///
    /// An empty phoneme means "no value" and is ignored, as is an empty key.
    pub fn insert(&mut self, key: &str, phoneme: impl Into<String>) {
        let phoneme = phoneme.into();
        if !key.is_empty() && !phoneme.is_empty() {
            self.trie.insert(key.chars(), phoneme);
        }
    }

    pub fn root(&self) -> &TrieNode<String> {
        self.trie.root()
    }

    pub fn trie(&self) -> &Trie<String> {
        &self.trie
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.trie.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

impl Vocabulary for PhonemeDictionary {
    fn match_len(&self, chars: &[char], start: usize) -> Option<usize> {
        self.trie.longest_match(chars, start).map(|(len, _)| len)
    }

    fn compound_len(&self, stem: &[char], tail: &[char]) -> Option<usize> {
        self.trie.extend_match(stem, tail)
    }
}

impl PhonemeLookup for PhonemeDictionary {
    fn lookup_longest(&self, chars: &[char], start: usize) -> Option<(usize, &str)> {
        self.trie
            .longest_match(chars, start)
            .map(|(len, v)| (len, v.as_str()))
    }
}
