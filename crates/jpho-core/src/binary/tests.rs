use std::collections::BTreeMap;
use std::io::Write;

use proptest::prelude::*;

use super::*;
use crate::converter::Converter;
use crate::dict::{DictError, PhonemeDictionary, PhonemeLookup, Vocabulary, WordDictionary};

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn sample_phonemes() -> PhonemeDictionary {
    PhonemeDictionary::from_entries([
        ("私", "wataɕi"),
        ("は", "ha"),
        ("リンゴ", "ɾiŋgo"),
        ("リン", "ɾiɴ"),
        ("好き", "sɯki"),
    ])
}

fn encode_sample() -> Vec<u8> {
    let words = WordDictionary::from_words(["私", "リンゴ", "食べる"]);
    encode(&sample_phonemes(), Some(&words)).unwrap()
}

#[test]
fn test_exact_layout_of_single_entry() {
    let dict = PhonemeDictionary::from_entries([("a", "X")]);
    let bytes = encode(&dict, None).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"JPHO");
    expected.extend_from_slice(&[2, 0, 0, 0]);
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(&0u32.to_le_bytes());
    expected.extend_from_slice(&23u32.to_le_bytes());
    // leaf "a": has value, no children, value "X"
    expected.extend_from_slice(&[0x01, 0x01, b'X']);
    // root: one child, 'a' at -11 from the end of the entry
    expected.extend_from_slice(&[0x02, 0x61, 0x00, 0x00]);
    expected.extend_from_slice(&(-11i32).to_le_bytes());

    assert_eq!(bytes, expected);
}

#[test]
fn test_round_trip_lookups() {
    let phonemes = sample_phonemes();
    let trie = BinaryTrie::from_bytes(encode_sample()).unwrap();

    phonemes.trie().for_each(|key, value| {
        let key_chars = chars(key);
        assert_eq!(
            trie.lookup_longest(&key_chars, 0),
            Some((key_chars.len(), value.as_str()))
        );
    });
    assert_eq!(trie.lookup_longest(&chars("リンゴ"), 0), Some((3, "ɾiŋgo")));
    assert_eq!(trie.lookup_longest(&chars("リンス"), 0), Some((2, "ɾiɴ")));
    assert_eq!(trie.lookup_longest(&chars("犬"), 0), None);
}

#[test]
fn test_header_counts() {
    let trie = decode(encode_sample()).unwrap();
    let header = trie.header();
    assert_eq!(header.version_major, VERSION_MAJOR);
    assert_eq!(header.version_minor, VERSION_MINOR);
    assert_eq!(header.phoneme_count, 5);
    assert_eq!(header.word_count, 3);
}

#[test]
fn test_word_markers_are_not_phonemes() {
    let trie = BinaryTrie::from_bytes(encode_sample()).unwrap();
    let text = chars("食べる");

    assert_eq!(trie.match_len(&text, 0), None);
    assert_eq!(trie.lookup_longest(&text, 0), None);
    assert_eq!(trie.words().match_len(&text, 0), Some(3));
    assert_eq!(trie.words().match_len(&chars("私"), 0), Some(1));
    assert_eq!(
        trie.words().compound_len(&chars("食"), &chars("べるよ")),
        Some(2)
    );
}

#[test]
fn test_empty_value_converts_the_same_after_encoding() {
    let dict = PhonemeDictionary::from_entries([("あ", ""), ("い", "i")]);
    let trie = BinaryTrie::from_bytes(encode(&dict, None).unwrap()).unwrap();
    assert_eq!(trie.header().phoneme_count, 1);
    for input in ["あ", "あい", "いあ"] {
        assert_eq!(
            Converter::new(&trie).convert(input),
            Converter::new(&dict).convert(input)
        );
    }
    assert_eq!(Converter::new(&trie).convert("あい"), "あi");
}

#[test]
fn test_wide_child_count() {
    let entries: Vec<(String, String)> = ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .chain(['!', '#', '$', '%'])
        .map(|c| (c.to_string(), format!("<{c}>")))
        .collect();
    assert!(entries.len() > MAX_PACKED_COUNT);

    let dict = PhonemeDictionary::from_entries(entries.iter().map(|(k, v)| (k, v.as_str())));
    let bytes = encode(&dict, None).unwrap();
    let root = u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]) as usize;
    assert_eq!(bytes[root] & FLAG_WIDE_COUNT, FLAG_WIDE_COUNT);

    let trie = BinaryTrie::from_bytes(bytes).unwrap();
    for (key, value) in &entries {
        assert_eq!(trie.lookup_longest(&chars(key), 0), Some((1, value.as_str())));
    }
}

#[test]
fn test_empty_dictionary() {
    let bytes = encode(&PhonemeDictionary::new(), None).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + 1);
    let trie = BinaryTrie::from_bytes(bytes).unwrap();
    assert_eq!(trie.lookup_longest(&chars("a"), 0), None);
}

#[test]
fn test_rejects_short_input() {
    assert!(matches!(
        BinaryTrie::from_bytes(b"JP".to_vec()),
        Err(DictError::InvalidHeader)
    ));
    assert!(matches!(
        BinaryTrie::from_bytes(b"JPHO\x02\x00".to_vec()),
        Err(DictError::InvalidHeader)
    ));
}

#[test]
fn test_rejects_bad_magic() {
    let mut bytes = encode_sample();
    bytes[0..4].copy_from_slice(b"LXDX");
    assert!(matches!(
        BinaryTrie::from_bytes(bytes),
        Err(DictError::InvalidMagic)
    ));
}

#[test]
fn test_rejects_other_major_version() {
    let mut bytes = encode_sample();
    bytes[4] = 3;
    assert!(matches!(
        BinaryTrie::from_bytes(bytes),
        Err(DictError::UnsupportedVersion(3))
    ));
}

#[test]
fn test_tolerates_unknown_minor_version() {
    let mut bytes = encode_sample();
    bytes[6] = 7;
    let trie = BinaryTrie::from_bytes(bytes).unwrap();
    assert_eq!(trie.header().version_minor, 7);
    assert_eq!(trie.lookup_longest(&chars("私"), 0), Some((1, "wataɕi")));
}

#[test]
fn test_rejects_truncated_nodes() {
    let mut bytes = encode(&PhonemeDictionary::from_entries([("a", "X")]), None).unwrap();
    bytes.pop();
    assert!(matches!(
        BinaryTrie::from_bytes(bytes),
        Err(DictError::Truncated { .. })
    ));
}

#[test]
fn test_rejects_out_of_range_root() {
    let mut bytes = encode_sample();
    bytes[16..20].copy_from_slice(&100_000u32.to_le_bytes());
    assert!(matches!(
        BinaryTrie::from_bytes(bytes),
        Err(DictError::InvalidOffset { offset: 100_000 })
    ));
}

#[test]
fn test_rejects_invalid_utf8_value() {
    let mut bytes = encode(&PhonemeDictionary::from_entries([("a", "X")]), None).unwrap();
    bytes[22] = 0xFF;
    assert!(matches!(
        BinaryTrie::from_bytes(bytes),
        Err(DictError::InvalidUtf8 { offset: 22 })
    ));
}

#[test]
fn test_rejects_child_pointing_outside_buffer() {
    let mut bytes = encode(&PhonemeDictionary::from_entries([("a", "X")]), None).unwrap();
    bytes[27..31].copy_from_slice(&1000i32.to_le_bytes());
    assert!(matches!(
        BinaryTrie::from_bytes(bytes),
        Err(DictError::InvalidOffset { .. })
    ));
}

#[test]
fn test_open_memory_mapped_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&encode_sample()).unwrap();
    file.flush().unwrap();

    let trie = BinaryTrie::open(file.path()).unwrap();
    assert_eq!(trie.lookup_longest(&chars("好き"), 0), Some((2, "sɯki")));
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        BinaryTrie::open(&dir.path().join("none.bin")),
        Err(DictError::Io(_))
    ));
}

fn arb_entries() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[あいうかきく私東京]{1,4}", "[a-zɕɾŋ]{1,6}", 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn binary_matches_in_memory(entries in arb_entries(), probe in "[あいうかきく私東京x]{0,8}") {
        let dict = PhonemeDictionary::from_entries(entries.iter().map(|(k, v)| (k, v.as_str())));
        let trie = BinaryTrie::from_bytes(encode(&dict, None).unwrap()).unwrap();
        let probe = chars(&probe);
        for start in 0..probe.len() {
            prop_assert_eq!(
                trie.lookup_longest(&probe, start),
                dict.lookup_longest(&probe, start)
            );
        }
    }
}
