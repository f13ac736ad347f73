//! Compact on-disk trie (JPHO v2).
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! header   magic "JPHO" | major u16 | minor u16 | phoneme_count u32
//!          | word_count u32 | root_offset u32                  (20 bytes)
//! node     flags u8
//!          [value_len varint, value bytes]       if flags & HAS_VALUE
//!          [child_count varint]                   if flags & WIDE_COUNT
//!          child entries, ascending by code point, 7 bytes each:
//!          code point u24 | child offset i32 relative to the end of the entry
//! ```
//!
//! Without `WIDE_COUNT`, bits 1-6 of `flags` hold the child count (0..=63).
//!
//! Phonemes and words share one trie: a non-empty value is a phoneme entry,
//! an empty value marks a word known only to the word list.

mod decode;
mod encode;
#[cfg(test)]
mod tests;
mod varint;

pub use decode::{BinaryTrie, BinaryWords};
pub use encode::encode;

pub(crate) const MAGIC: &[u8; 4] = b"JPHO";
pub const VERSION_MAJOR: u16 = 2;
pub const VERSION_MINOR: u16 = 0;
pub(crate) const HEADER_SIZE: usize = 4 + 2 + 2 + 4 + 4 + 4;

pub(crate) const FLAG_HAS_VALUE: u8 = 0x01;
pub(crate) const FLAG_WIDE_COUNT: u8 = 0x80;
pub(crate) const PACKED_COUNT_MASK: u8 = 0x7E;
pub(crate) const MAX_PACKED_COUNT: usize = 63;
pub(crate) const CHILD_ENTRY_SIZE: usize = 7;

/// Validate `data` and wrap it as a queryable trie.
pub fn decode(data: Vec<u8>) -> Result<BinaryTrie, crate::dict::DictError> {
    BinaryTrie::from_bytes(data)
}

/// Decoded file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version_major: u16,
    pub version_minor: u16,
    pub phoneme_count: u32,
    pub word_count: u32,
    pub root_offset: u32,
}

impl Header {
    pub(crate) fn write(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(MAGIC);
        buf[4..6].copy_from_slice(&self.version_major.to_le_bytes());
        buf[6..8].copy_from_slice(&self.version_minor.to_le_bytes());
        buf[8..12].copy_from_slice(&self.phoneme_count.to_le_bytes());
        buf[12..16].copy_from_slice(&self.word_count.to_le_bytes());
        buf[16..20].copy_from_slice(&self.root_offset.to_le_bytes());
    }
}
