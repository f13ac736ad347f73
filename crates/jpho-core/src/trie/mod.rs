//! Generic code-point trie with longest-match lookup.
//!
//! `Trie<V>` owns its nodes as a tree of boxed children keyed by `char`.
//! It is built once through `insert` and then only read; lookups never
//! mutate, so a built trie can be shared across threads freely.

mod walk;


use std::collections::HashMap;

pub(crate) use walk::{extend_match, longest_match, Cursor};

pub struct TrieNode<V> {
    children: HashMap<char, Box<TrieNode<V>>>,
    value: Option<V>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }
}

impl<V> TrieNode<V> {
    pub fn child(&self, c: char) -> Option<&TrieNode<V>> {
        self.children.get(&c).map(|b| b.as_ref())
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Children sorted ascending by code point.
    pub fn sorted_children(&self) -> Vec<(char, &TrieNode<V>)> {
        let mut children: Vec<(char, &TrieNode<V>)> =
            self.children.iter().map(|(&c, n)| (c, n.as_ref())).collect();
        children.sort_unstable_by_key(|&(c, _)| c);
        children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl<'a, V> Cursor for &'a TrieNode<V> {
    fn child(self, c: char) -> Option<Self> {
        TrieNode::child(self, c)
    }
}

pub struct Trie<V> {
    root: TrieNode<V>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }

    /// Insert `value` at the path spelled by `key`.
    ///
    /// A later insert of the same key replaces the earlier value (last write
    /// wins); the replaced value is returned.
    pub fn insert<I>(&mut self, key: I, value: V) -> Option<V>
    where
        I: IntoIterator<Item = char>,
    {
        let mut node = &mut self.root;
        for c in key {
            node = node.children.entry(c).or_default();
        }
        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn root(&self) -> &TrieNode<V> {
        &self.root
    }

    /// Number of distinct keys carrying a value.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exact lookup of a whole key.
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = &self.root;
        for c in key.chars() {
            node = node.child(c)?;
        }
        node.value()
    }

    /// Longest key that is a prefix of `chars[start..]`.
    ///
    /// Returns the match length in code points and the stored value.
    pub fn longest_match(&self, chars: &[char], start: usize) -> Option<(usize, &V)> {
        longest_match(&self.root, chars, start, |n| n.value.is_some())
            .and_then(|(len, node)| node.value().map(|v| (len, v)))
    }

    /// Longest prefix of `tail` such that `stem + prefix` is a key, provided
    /// the whole `stem` exists as a path.
    pub fn extend_match(&self, stem: &[char], tail: &[char]) -> Option<usize> {
        extend_match(&self.root, stem, tail, |n| n.value.is_some())
    }

    /// Visit every `(key, value)` pair in code-point order.
    pub fn for_each<F: FnMut(&str, &V)>(&self, mut f: F) {
        fn visit<V, F: FnMut(&str, &V)>(node: &TrieNode<V>, key: &mut String, f: &mut F) {
            if let Some(v) = node.value() {
                f(key, v);
            }
            for (c, child) in node.sorted_children() {
                key.push(c);
                visit(child, key, f);
                key.pop();
            }
        }
        let mut key = String::new();
        visit(&self.root, &mut key, &mut f);
    }
}
