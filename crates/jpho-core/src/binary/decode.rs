use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, debug_span};

use crate::dict::{DictError, PhonemeLookup, Vocabulary};
use crate::trie::{extend_match, longest_match, Cursor};

use super::varint::read_varint;
use super::{
    Header, CHILD_ENTRY_SIZE, FLAG_HAS_VALUE, FLAG_WIDE_COUNT, HEADER_SIZE, MAGIC,
    PACKED_COUNT_MASK, VERSION_MAJOR, VERSION_MINOR,
};

enum Backing {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Backing {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Owned(v) => v.as_slice(),
            Backing::Mapped(m) => &m[..],
        }
    }
}

/// A JPHO v2 trie navigated in place over its raw bytes.
///
/// Every reachable node is validated once when the trie is opened, so
/// lookups only do offset arithmetic and binary search per node.
pub struct BinaryTrie {
    data: Backing,
    header: Header,
}

impl BinaryTrie {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, DictError> {
        Self::with_backing(Backing::Owned(data))
    }

    /// Memory-map a trie file.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::with_backing(Backing::Mapped(mmap))
    }

    fn with_backing(data: Backing) -> Result<Self, DictError> {
        let _span = debug_span!("decode_binary", bytes = data.bytes().len()).entered();
        let header = parse_header(data.bytes())?;
        let node_count = validate(data.bytes(), header.root_offset as usize)?;
        debug!(
            phonemes = header.phoneme_count,
            words = header.word_count,
            node_count,
            "binary trie validated"
        );
        Ok(Self { data, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    fn root(&self) -> NodeRef<'_> {
        // Validated in `with_backing`; an unparsable root cannot occur here.
        NodeRef::parse(self.data.bytes(), self.header.root_offset as usize)
            .unwrap_or_else(|_| NodeRef::empty(self.data.bytes()))
    }

    /// Word-existence view: every stored key counts, including the
    /// empty-valued word markers.
    pub fn words(&self) -> BinaryWords<'_> {
        BinaryWords(self)
    }
}

impl Vocabulary for BinaryTrie {
    fn match_len(&self, chars: &[char], start: usize) -> Option<usize> {
        longest_match(self.root(), chars, start, NodeRef::has_phoneme).map(|(len, _)| len)
    }

    fn compound_len(&self, stem: &[char], tail: &[char]) -> Option<usize> {
        extend_match(self.root(), stem, tail, NodeRef::has_phoneme)
    }
}

impl PhonemeLookup for BinaryTrie {
    fn lookup_longest(&self, chars: &[char], start: usize) -> Option<(usize, &str)> {
        let (len, node) = longest_match(self.root(), chars, start, NodeRef::has_phoneme)?;
        node.value().map(|v| (len, v))
    }
}

/// Word-existence view over a [`BinaryTrie`].
#[derive(Clone, Copy)]
pub struct BinaryWords<'a>(&'a BinaryTrie);

impl Vocabulary for BinaryWords<'_> {
    fn match_len(&self, chars: &[char], start: usize) -> Option<usize> {
        longest_match(self.0.root(), chars, start, NodeRef::has_value).map(|(len, _)| len)
    }

    fn compound_len(&self, stem: &[char], tail: &[char]) -> Option<usize> {
        extend_match(self.0.root(), stem, tail, NodeRef::has_value)
    }
}

fn read_u16(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

fn parse_header(data: &[u8]) -> Result<Header, DictError> {
    if data.len() < MAGIC.len() {
        return Err(DictError::InvalidHeader);
    }
    if &data[..4] != MAGIC {
        return Err(DictError::InvalidMagic);
    }
    if data.len() < HEADER_SIZE {
        return Err(DictError::InvalidHeader);
    }
    let header = Header {
        version_major: read_u16(data, 4),
        version_minor: read_u16(data, 6),
        phoneme_count: read_u32(data, 8),
        word_count: read_u32(data, 12),
        root_offset: read_u32(data, 16),
    };
    if header.version_major != VERSION_MAJOR {
        return Err(DictError::UnsupportedVersion(header.version_major));
    }
    if header.version_minor != VERSION_MINOR {
        debug!(
            minor = header.version_minor,
            "unknown minor version, reading as {VERSION_MAJOR}.{VERSION_MINOR}"
        );
    }
    Ok(header)
}

/// Parse every node reachable from `root`; returns the number of nodes.
fn validate(data: &[u8], root: usize) -> Result<usize, DictError> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(offset) = stack.pop() {
        if !seen.insert(offset) {
            continue;
        }
        let node = NodeRef::parse(data, offset)?;
        if let Some((start, end)) = node.value {
            std::str::from_utf8(&data[start..end])
                .map_err(|_| DictError::InvalidUtf8 { offset: start })?;
        }
        let mut prev: Option<u32> = None;
        for i in 0..node.count {
            let entry = node.children_start + i * CHILD_ENTRY_SIZE;
            let cp = node.code_point(i);
            if char::from_u32(cp).is_none() || prev.is_some_and(|p| p >= cp) {
                return Err(DictError::InvalidCodePoint { offset: entry });
            }
            prev = Some(cp);
            stack.push(node.child_offset(i)?);
        }
    }
    Ok(seen.len())
}

/// A parsed node header pointing into the raw buffer.
#[derive(Clone, Copy)]
struct NodeRef<'a> {
    data: &'a [u8],
    value: Option<(usize, usize)>,
    children_start: usize,
    count: usize,
}

impl<'a> NodeRef<'a> {
    fn empty(data: &'a [u8]) -> Self {
        Self {
            data,
            value: None,
            children_start: 0,
            count: 0,
        }
    }

    fn parse(data: &'a [u8], offset: usize) -> Result<Self, DictError> {
        if offset < HEADER_SIZE {
            return Err(DictError::InvalidOffset { offset });
        }
        let flags = *data.get(offset).ok_or(DictError::InvalidOffset { offset })?;
        let mut pos = offset + 1;

        let value = if flags & FLAG_HAS_VALUE != 0 {
            let (len, next) = read_varint(data, pos)?;
            let end = next
                .checked_add(len as usize)
                .filter(|&end| end <= data.len())
                .ok_or(DictError::Truncated { offset: next })?;
            pos = end;
            Some((next, end))
        } else {
            None
        };

        let count = if flags & FLAG_WIDE_COUNT != 0 {
            let (count, next) = read_varint(data, pos)?;
            pos = next;
            count as usize
        } else {
            usize::from((flags & PACKED_COUNT_MASK) >> 1)
        };

        count
            .checked_mul(CHILD_ENTRY_SIZE)
            .and_then(|n| n.checked_add(pos))
            .filter(|&end| end <= data.len())
            .ok_or(DictError::Truncated { offset: pos })?;

        Ok(Self {
            data,
            value,
            children_start: pos,
            count,
        })
    }

    fn has_value(self) -> bool {
        self.value.is_some()
    }

    fn has_phoneme(self) -> bool {
        self.value.is_some_and(|(start, end)| end > start)
    }

    fn value(self) -> Option<&'a str> {
        let (start, end) = self.value?;
        std::str::from_utf8(&self.data[start..end]).ok()
    }

    fn code_point(&self, i: usize) -> u32 {
        let p = self.children_start + i * CHILD_ENTRY_SIZE;
        u32::from_le_bytes([self.data[p], self.data[p + 1], self.data[p + 2], 0])
    }

    fn child_offset(&self, i: usize) -> Result<usize, DictError> {
        let p = self.children_start + i * CHILD_ENTRY_SIZE + 3;
        let relative = read_u32(self.data, p) as i32;
        let entry_end = p + 4;
        let target = entry_end as i64 + i64::from(relative);
        if target < HEADER_SIZE as i64 || target >= self.data.len() as i64 {
            return Err(DictError::InvalidOffset { offset: p });
        }
        Ok(target as usize)
    }

    fn find_child(&self, c: char) -> Option<usize> {
        let target = c as u32;
        let (mut lo, mut hi) = (0, self.count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.code_point(mid).cmp(&target) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(mid),
            }
        }
        None
    }
}

impl Cursor for NodeRef<'_> {
    fn child(self, c: char) -> Option<Self> {
        let i = self.find_child(c)?;
        let offset = self.child_offset(i).ok()?;
        NodeRef::parse(self.data, offset).ok()
    }
}
