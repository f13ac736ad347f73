use tracing::{debug, debug_span};

use crate::dict::{DictError, PhonemeDictionary, WordDictionary};
use crate::trie::{Trie, TrieNode};

use super::varint::write_varint;
use super::{
    Header, CHILD_ENTRY_SIZE, FLAG_HAS_VALUE, FLAG_WIDE_COUNT, HEADER_SIZE, MAX_PACKED_COUNT,
    VERSION_MAJOR, VERSION_MINOR,
};

/// Serialize a phoneme dictionary, optionally merged with a word list, into
/// the JPHO v2 layout.
///
/// Words that have no phoneme entry are stored with an empty value.
pub fn encode(
    phonemes: &PhonemeDictionary,
    words: Option<&WordDictionary>,
) -> Result<Vec<u8>, DictError> {
    let _span = debug_span!("encode_binary", phonemes = phonemes.len()).entered();

    let mut merged: Trie<String> = Trie::new();
    phonemes.trie().for_each(|key, value| {
        merged.insert(key.chars(), value.clone());
    });
    if let Some(words) = words {
        words.trie().for_each(|word, _| {
            if merged.get(word).is_none() {
                merged.insert(word.chars(), String::new());
            }
        });
    }

    let mut buf = vec![0u8; HEADER_SIZE];
    let root_offset = write_node(merged.root(), &mut buf)?;

    let header = Header {
        version_major: VERSION_MAJOR,
        version_minor: VERSION_MINOR,
        phoneme_count: to_u32(phonemes.len(), "phoneme count")?,
        word_count: to_u32(words.map_or(0, WordDictionary::len), "word count")?,
        root_offset: to_u32(root_offset, "root offset")?,
    };
    header.write(&mut buf[..HEADER_SIZE]);

    debug!(bytes = buf.len(), root_offset, "binary trie encoded");
    Ok(buf)
}

fn to_u32(n: usize, what: &'static str) -> Result<u32, DictError> {
    n.try_into().map_err(|_| DictError::TooLarge(what))
}

/// Write `node` after all of its descendants; returns the node's offset.
fn write_node(node: &TrieNode<String>, buf: &mut Vec<u8>) -> Result<usize, DictError> {
    let children = node.sorted_children();
    let mut child_offsets = Vec::with_capacity(children.len());
    for &(c, child) in &children {
        child_offsets.push((c, write_node(child, buf)?));
    }

    let start = buf.len();
    let count = children.len();
    let mut flags = 0u8;
    if node.value().is_some() {
        flags |= FLAG_HAS_VALUE;
    }
    if count > MAX_PACKED_COUNT {
        flags |= FLAG_WIDE_COUNT;
    } else {
        flags |= (count as u8) << 1;
    }
    buf.push(flags);

    if let Some(value) = node.value() {
        write_varint(buf, to_u32(value.len(), "value length")?);
        buf.extend_from_slice(value.as_bytes());
    }
    if count > MAX_PACKED_COUNT {
        write_varint(buf, to_u32(count, "child count")?);
    }

    for (c, child_offset) in child_offsets {
        let cp = c as u32;
        buf.extend_from_slice(&cp.to_le_bytes()[..3]);
        let entry_end = buf.len() + 4;
        let relative = i32::try_from(child_offset as i64 - entry_end as i64)
            .map_err(|_| DictError::TooLarge("child offset"))?;
        buf.extend_from_slice(&relative.to_le_bytes());
        debug_assert_eq!(buf.len(), entry_end);
    }
    debug_assert!(buf.len() - start >= 1 + count * CHILD_ENTRY_SIZE);

    Ok(start)
}
