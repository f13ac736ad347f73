use super::*;
use crate::dict::{PhonemeDictionary, WordDictionary};

fn phonemes() -> PhonemeDictionary {
    PhonemeDictionary::from_entries([
        ("私", "wataɕi"),
        ("は", "ha"),
        ("リンゴ", "ɾiŋgo"),
        ("が", "ga"),
        ("好き", "sɯki"),
        ("です", "desɯ"),
        ("けんた", "kẽ̞ɴta"),
        ("バカ", "baka"),
        ("みる", "miɾɯ"),
        ("見る", "miɾɯ"),
    ])
}

fn words() -> WordDictionary {
    WordDictionary::from_words(["私", "リンゴ", "好き", "見る"])
}

#[test]
fn test_exact_key_round_trip() {
    let dict = phonemes();
    let converter = Converter::new(&dict);
    assert_eq!(converter.convert("リンゴ"), "ɾiŋgo");
    assert_eq!(converter.convert("けんた"), "kẽ̞ɴta");
}

#[test]
fn test_longest_match_priority() {
    let dict = PhonemeDictionary::from_entries([("a", "X"), ("ab", "Y")]);
    let converter = Converter::new(&dict);
    assert_eq!(converter.convert("ab"), "Y");
    assert_eq!(converter.convert("aab"), "XY");
}

#[test]
fn test_shorter_match_kept_when_longer_path_dead_ends() {
    let dict = PhonemeDictionary::from_entries([("a", "X"), ("abc", "Z")]);
    let converter = Converter::new(&dict);
    assert_eq!(converter.convert("abd"), "Xbd");
}

#[test]
fn test_unmatched_passthrough() {
    let dict = PhonemeDictionary::from_entries([("a", "X")]);
    let converter = Converter::new(&dict);
    assert_eq!(converter.convert("a?"), "X?");

    let result = converter.convert_detailed("a?");
    assert_eq!(result.phonemes, "X?");
    assert_eq!(result.unmatched, vec!['?']);
    assert_eq!(
        result.matches,
        vec![ConversionMatch {
            original: "a".into(),
            phoneme: "X".into(),
            position: 0,
        }]
    );
}

#[test]
fn test_detailed_positions_are_byte_offsets() {
    let dict = phonemes();
    let converter = Converter::new(&dict);
    let result = converter.convert_detailed("私がリンゴ");
    let positions: Vec<usize> = result.matches.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 3, 6]);
    assert!(result.unmatched.is_empty());
}

#[test]
fn test_empty_input() {
    let dict = phonemes();
    let converter = Converter::new(&dict);
    assert_eq!(converter.convert(""), "");
    assert_eq!(converter.convert_detailed(""), ConversionResult::default());
    assert_eq!(converter.convert_with_segmentation(""), "");
}

#[test]
fn test_last_write_wins() {
    let mut dict = PhonemeDictionary::new();
    dict.insert("私", "first");
    dict.insert("私", "second");
    assert_eq!(dict.len(), 1);
    assert_eq!(Converter::new(&dict).convert("私"), "second");
}

#[test]
fn test_segmentation_with_particle_override() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    assert_eq!(
        converter.convert_with_segmentation("私はリンゴが好きです"),
        "wataɕi wa ɾiŋgo ga sɯki desɯ"
    );
}

#[test]
fn test_particle_override_ignores_dictionary() {
    let dict = PhonemeDictionary::from_entries([("は", "ha")]);
    let words = WordDictionary::new();
    let converter = Converter::new(&dict).with_words(&words);
    assert_eq!(converter.convert_with_segmentation("は"), "wa");

    let custom = Converter::new(&dict)
        .with_words(&words)
        .with_topic_particle(TopicParticle {
            glyph: "は".into(),
            reading: "β".into(),
        });
    assert_eq!(custom.convert_with_segmentation("は"), "β");
}

#[test]
fn test_particle_inside_word_is_not_overridden() {
    let dict = phonemes();
    let words = WordDictionary::from_words(["はな"]);
    let converter = Converter::new(&dict).with_words(&words);
    assert_eq!(converter.convert_with_segmentation("はな"), "haな");
}

#[test]
fn test_furigana_hint_pipeline() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    assert_eq!(
        converter.convert_with_segmentation("健太「けんた」はバカ"),
        "kẽ̞ɴta wa baka"
    );
}

#[test]
fn test_compound_pipeline() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    assert_eq!(converter.convert_with_segmentation("見「み」る"), "miɾɯ");
}

#[test]
fn test_segmentation_without_word_list_uses_phonemes() {
    let dict = phonemes();
    let converter = Converter::new(&dict);
    assert_eq!(
        converter.convert_with_segmentation("私はリンゴ"),
        "wataɕi wa ɾiŋgo"
    );
}

#[test]
fn test_detailed_segmentation_positions_in_original_text() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    let result = converter.convert_detailed_with_segmentation("健太「けんた」は私");
    assert_eq!(result.phonemes, "kẽ̞ɴta wa wataɕi");
    let found: Vec<(&str, usize)> = result
        .matches
        .iter()
        .map(|m| (m.original.as_str(), m.position))
        .collect();
    assert_eq!(found, vec![("けんた", 0), ("は", 21), ("私", 24)]);
}

#[test]
fn test_detailed_segmentation_after_dropped_hint() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    let result = converter.convert_detailed_with_segmentation("私「」が");
    assert_eq!(result.phonemes, "wataɕi ga");
    let positions: Vec<usize> = result.matches.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 9]);
}

#[test]
fn test_detailed_segmentation_collects_unmatched() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    let result = converter.convert_detailed_with_segmentation("私はX");
    assert_eq!(result.phonemes, "wataɕi wa X");
    assert_eq!(result.unmatched, vec!['X']);
}

#[test]
fn test_idempotent() {
    let dict = phonemes();
    let words = words();
    let converter = Converter::new(&dict).with_words(&words);
    let text = "健太「けんた」は私、リンゴが好きです?";
    let first = converter.convert_detailed_with_segmentation(text);
    for _ in 0..3 {
        assert_eq!(converter.convert_detailed_with_segmentation(text), first);
        assert_eq!(converter.convert(text), converter.convert(text));
    }
}
