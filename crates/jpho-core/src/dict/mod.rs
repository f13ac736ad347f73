//! Phoneme and word dictionaries.
//!
//! `PhonemeDictionary` maps surface text to a phonetic value.
//! `WordDictionary` only records that a word exists; it is used to find word
//! boundaries, never to produce output. Both are built once and then shared
//! read-only.
//!
//! The algorithms in `furigana`, `segmenter` and `converter` work against the
//! `Vocabulary` / `PhonemeLookup` traits so that a memory-mapped
//! [`BinaryTrie`](crate::binary::BinaryTrie) can stand in for either
//! dictionary.

mod phoneme;
mod text;
mod word;

pub use phoneme::PhonemeDictionary;
pub use word::WordDictionary;

use std::io;

/// Unified error type for dictionary loading and the binary trie format.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected JPHO)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u16),

    #[error("truncated node data at offset {offset}")]
    Truncated { offset: usize },

    #[error("invalid varint at offset {offset}")]
    InvalidVarint { offset: usize },

    #[error("invalid UTF-8 value at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("invalid or unsorted code point at offset {offset}")]
    InvalidCodePoint { offset: usize },

    #[error("node offset out of range at offset {offset}")]
    InvalidOffset { offset: usize },

    #[error("{0} exceeds the binary format limit")]
    TooLarge(&'static str),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Existence lookups used for word boundaries and compound detection.
pub trait Vocabulary: Send + Sync {
    /// Length in code points of the longest entry starting at `chars[start]`.
    fn match_len(&self, chars: &[char], start: usize) -> Option<usize>;

    /// With `stem` walked as a plain path, the length of the longest prefix
    /// of `tail` that completes an entry.
    fn compound_len(&self, stem: &[char], tail: &[char]) -> Option<usize>;
}

/// Longest-match phoneme lookup.
pub trait PhonemeLookup: Vocabulary {
    /// Longest entry starting at `chars[start]`: its length in code points
    /// and its phonetic value.
    fn lookup_longest(&self, chars: &[char], start: usize) -> Option<(usize, &str)>;
}
