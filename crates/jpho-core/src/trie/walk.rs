//! Cursor-generic trie walks shared by the in-memory and binary tries.

/// A position in a trie that can step to a child by code point.
pub trait Cursor: Copy {
    fn child(self, c: char) -> Option<Self>;
}

/// Longest match of `chars[start..]` against the trie rooted at `root`.
///
/// Walks children while they exist and remembers the deepest node accepted
/// by `accept`. Returns the match length in code points and that node.
pub fn longest_match<C, F>(root: C, chars: &[char], start: usize, accept: F) -> Option<(usize, C)>
where
    C: Cursor,
    F: Fn(C) -> bool,
{
    let mut best = None;
    let mut node = root;
    for (i, &c) in chars.iter().enumerate().skip(start) {
        let Some(next) = node.child(c) else {
            break;
        };
        node = next;
        if accept(node) {
            best = Some((i - start + 1, node));
        }
    }
    best
}

/// Follow `stem` as a pure path (no terminal required), then continue into
/// `tail` and return the longest accepted prefix length of `tail`.
///
/// Returns `None` if the stem path is missing or no position in `tail`
/// reaches an accepted node.
pub fn extend_match<C, F>(root: C, stem: &[char], tail: &[char], accept: F) -> Option<usize>
where
    C: Cursor,
    F: Fn(C) -> bool,
{
    let mut node = root;
    for &c in stem {
        node = node.child(c)?;
    }
    longest_match(node, tail, 0, accept).map(|(len, _)| len)
}
